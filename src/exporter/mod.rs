// ==========================================
// 库存资产管理系统 - 导出层
// ==========================================
// 职责: 所选行动/包裹 → 可下载文件
// 流程: RelationalFetcher → RowFlattener → WorkbookBuilder / CsvBuilder → ArtifactSink
// 支持: Excel (.xlsx), CSV
// ==========================================

pub mod csv_builder;
pub mod error;
pub mod fetcher;
pub mod flattener;
pub mod inventory_exporter;
pub mod sink;
pub mod template;
pub mod workbook;
pub mod xlsx_writer;

// 重导出核心类型
pub use csv_builder::CsvBuilder;
pub use error::{ExportError, ExportResult};
pub use fetcher::RelationalFetcher;
pub use flattener::RowFlattener;
pub use inventory_exporter::{render, InventoryExporter};
pub use sink::{ArtifactSink, DirectorySink};
pub use template::TemplateBuilder;
pub use workbook::WorkbookBuilder;
pub use xlsx_writer::{CellValue, XlsxWriter};

// 重导出 Trait 接口
pub use crate::repository::export_source::ExportSource;
