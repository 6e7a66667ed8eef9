// ==========================================
// 库存资产管理系统 - 应用层
// ==========================================
// 职责: 装配共享连接、API 与当前用户
// ==========================================

pub mod session;
pub mod state;

// 重导出
pub use session::{Anonymous, CurrentUserProvider, FixedUser};
pub use state::{get_default_db_path, AppState};
