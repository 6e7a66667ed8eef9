// ==========================================
// 库存资产管理系统 - 导入层
// ==========================================
// 职责: 表格文件 → 物品记录
// 流程: FileParser → RowValidator → TaxonomyResolver → BatchPersister
// 支持: Excel (.xlsx), CSV
// ==========================================

// 模块声明
pub mod batch_persister;
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod item_importer;
pub mod row_validator;
pub mod taxonomy_resolver;

// 重导出核心类型
pub use batch_persister::BatchPersister;
pub use error::{ImportError, ImportResult, TaxonomyError};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use item_importer::ItemImporterImpl;
pub use row_validator::{RowValidator, EXPECTED_COLUMNS, REQUIRED_COLUMNS};
pub use taxonomy_resolver::TaxonomyResolver;

// 重导出 Trait 接口
pub use crate::repository::import_store::{ItemStore, TaxonomySource};
pub use importer_trait::{FileParser, ItemImporter, LogProgressReporter, ProgressReporter};
