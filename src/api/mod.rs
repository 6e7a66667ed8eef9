// ==========================================
// 库存资产管理系统 - API 层
// ==========================================
// 职责: 面向调用方的业务接口（CLI / 上层应用）
// ==========================================

pub mod error;
pub mod export_api;
pub mod import_api;

// 重导出
pub use error::{ApiError, ApiResult};
pub use export_api::{ExportApi, ExportApiResponse, SavedFile};
pub use import_api::{ImportApi, ImportApiResponse};
