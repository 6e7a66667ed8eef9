// ==========================================
// 库存资产管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{ApiError, ApiResult, ExportApi, ImportApi};
use crate::app::session::CurrentUserProvider;
use crate::config::{config_keys, ConfigManager};
use crate::db::{init_schema, open_sqlite_connection};

/// 覆盖默认数据库路径的环境变量
pub const DB_PATH_ENV: &str = "INVENTORY_HUB_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享连接（所有仓储共用）
    pub conn: Arc<Mutex<Connection>>,

    /// 物品导入API
    pub import_api: Arc<ImportApi>,

    /// 库存导出API
    pub export_api: Arc<ExportApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    current_user: Arc<dyn CurrentUserProvider>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并执行建表脚本（幂等）
    /// 2. 按配置切换界面语言（app.locale）
    /// 3. 创建所有API实例
    pub fn new(db_path: String, current_user: Arc<dyn CurrentUserProvider>) -> ApiResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(format!("无法打开数据库: {}", e)))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = ConfigManager::from_connection(conn.clone())
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        // 仅在显式配置时切换,未配置保持进程当前语言
        match config_manager.get_global_config_value(config_keys::APP_LOCALE) {
            Ok(Some(_)) => match config_manager.get_locale() {
                Ok(locale) => {
                    crate::i18n::set_locale(&locale);
                }
                Err(e) => tracing::warn!("读取界面语言失败(使用默认值): {}", e),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!("读取界面语言失败(使用默认值): {}", e),
        }

        Ok(Self {
            db_path,
            import_api: Arc::new(ImportApi::new(conn.clone())),
            export_api: Arc::new(ExportApi::new(conn.clone())),
            config_manager: Arc::new(config_manager),
            conn,
            current_user,
        })
    }

    /// 当前登录用户 id
    ///
    /// # 返回
    /// - Err(ApiError::Unauthenticated): 未登录
    pub fn require_user(&self) -> ApiResult<i64> {
        self.current_user
            .current_user_id()
            .ok_or(ApiError::Unauthenticated)
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./inventory_hub.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("inventory-hub");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("inventory_hub.db");
        }
    }

    path.to_string_lossy().to_string()
}
