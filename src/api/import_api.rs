// ==========================================
// 库存资产管理系统 - 物品导入API
// ==========================================
// 职责: 封装物品导入流程,返回可序列化的汇总
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::import::{FieldError, ImportReport, RowFailure};
use crate::i18n::t_with_args;
use crate::importer::{ItemImporter, ItemImporterImpl, LogProgressReporter, ProgressReporter};
use crate::repository::{ItemRepository, TaxonomyRepository};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 本次导入运行ID
    pub import_id: String,
    /// 文件数据行数（不含表头）
    pub total_rows: usize,
    /// 成功写入的物品数量
    pub imported: usize,
    /// 分类解析或写库失败的数量
    pub failed: usize,
    /// 校验未通过的行数
    pub invalid_rows: usize,
    pub batches: usize,
    /// 行号（从 1 开始）→ 字段错误
    pub validation_errors: BTreeMap<usize, Vec<FieldError>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RowFailure>,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
    /// 本地化的汇总消息
    pub message: String,
}

impl From<ImportReport> for ImportApiResponse {
    fn from(report: ImportReport) -> Self {
        let succeeded = report.succeeded.to_string();
        let failed = report.failed.to_string();
        let invalid = report.validation_errors.len().to_string();
        let message = t_with_args(
            "import.summary",
            &[
                ("succeeded", succeeded.as_str()),
                ("failed", failed.as_str()),
                ("invalid", invalid.as_str()),
            ],
        );

        Self {
            import_id: report.import_id,
            total_rows: report.total_rows,
            imported: report.succeeded,
            failed: report.failed,
            invalid_rows: report.validation_errors.len(),
            batches: report.batches,
            validation_errors: report.validation_errors,
            failures: report.failures,
            elapsed_ms: report.elapsed_ms,
            message,
        }
    }
}

type SqliteItemImporter = ItemImporterImpl<ItemRepository, TaxonomyRepository, ConfigManager>;

/// 导入API
pub struct ImportApi {
    conn: Arc<Mutex<Connection>>,
    reporter: Arc<dyn ProgressReporter>,
}

impl ImportApi {
    /// 创建新的ImportApi实例（共享连接）
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            reporter: Arc::new(LogProgressReporter),
        }
    }

    /// 替换进度回报器
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    fn create_importer(&self) -> ApiResult<SqliteItemImporter> {
        let config = ConfigManager::from_connection(self.conn.clone())
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        Ok(ItemImporterImpl::new(
            ItemRepository::from_connection(self.conn.clone()),
            TaxonomyRepository::from_connection(self.conn.clone()),
            config,
        )
        .with_reporter(self.reporter.clone()))
    }

    /// 导入物品文件
    ///
    /// # 参数
    /// - user_id: 当前登录用户（所有物品归属此用户）
    /// - file_path: .xlsx / .csv 文件路径
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入汇总（行级问题在响应内,不算失败）
    /// - Err(ApiError): 文件级错误
    pub async fn import_items(&self, user_id: i64, file_path: &str) -> ApiResult<ImportApiResponse> {
        let importer = self.create_importer()?;
        let report = importer.import_file(user_id, Path::new(file_path)).await?;
        Ok(report.into())
    }

    /// 导入上传内容（扩展名由调用方声明）
    pub async fn import_upload(
        &self,
        user_id: i64,
        bytes: &[u8],
        extension: &str,
    ) -> ApiResult<ImportApiResponse> {
        let importer = self.create_importer()?;
        let report = importer.import_bytes(user_id, bytes, extension).await?;
        Ok(report.into())
    }
}
