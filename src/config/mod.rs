// ==========================================
// 库存资产管理系统 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod export_config_trait;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_BATCH_SIZE, DEFAULT_LOCALE};
pub use export_config_trait::ExportConfigReader;
pub use import_config_trait::ImportConfigReader;
