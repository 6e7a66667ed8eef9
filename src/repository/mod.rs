// ==========================================
// 库存资产管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,按 user_id 隔离租户
// ==========================================

pub mod error;
pub mod export_read_repo;
pub mod export_source;
pub mod import_store;
pub mod item_repo;
pub mod operation_repo;
pub mod package_repo;
mod row_mapping;
pub mod taxonomy_repo;
pub mod user_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use export_read_repo::ExportReadRepository;
pub use export_source::ExportSource;
pub use import_store::{ItemStore, TaxonomySource};
pub use item_repo::ItemRepository;
pub use operation_repo::OperationRepository;
pub use package_repo::PackageRepository;
pub use taxonomy_repo::TaxonomyRepository;
pub use user_repo::UserRepository;
