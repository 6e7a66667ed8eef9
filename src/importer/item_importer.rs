// ==========================================
// 库存资产管理系统 - 物品导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 校验 → 分类树加载 → 分批解析 + 落库
// ==========================================

use crate::config::config_keys;
use crate::config::ImportConfigReader;
use crate::domain::import::{ImportReport, RawRow};
use crate::i18n::t_with_args;
use crate::importer::batch_persister::BatchPersister;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{ItemImporter, LogProgressReporter, ProgressReporter};
use crate::importer::row_validator::RowValidator;
use crate::importer::taxonomy_resolver::TaxonomyResolver;
use crate::repository::import_store::{ItemStore, TaxonomySource};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

// ==========================================
// ItemImporterImpl - 物品导入器
// ==========================================
pub struct ItemImporterImpl<S, T, C>
where
    S: ItemStore,
    T: TaxonomySource,
    C: ImportConfigReader,
{
    // 数据访问层
    item_store: S,
    taxonomy_source: T,

    // 配置读取器
    config: C,

    // 导入组件
    file_parser: UniversalFileParser,
    row_validator: RowValidator,
    reporter: Arc<dyn ProgressReporter>,
}

impl<S, T, C> ItemImporterImpl<S, T, C>
where
    S: ItemStore,
    T: TaxonomySource,
    C: ImportConfigReader,
{
    /// 创建新的 ItemImporter 实例（进度写日志）
    pub fn new(item_store: S, taxonomy_source: T, config: C) -> Self {
        Self {
            item_store,
            taxonomy_source,
            config,
            file_parser: UniversalFileParser,
            row_validator: RowValidator,
            reporter: Arc::new(LogProgressReporter),
        }
    }

    /// 替换进度回报器
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    async fn batch_size(&self) -> ImportResult<usize> {
        match self.config.get_batch_size().await {
            Ok(size) => Ok(size),
            Err(e) => Err(ImportError::ConfigReadError {
                key: config_keys::IMPORT_BATCH_SIZE.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// 解析之后的公共流程
    async fn run(&self, import_id: String, user_id: i64, raw_rows: Vec<RawRow>, started: Instant) -> ImportResult<ImportReport> {
        let total_rows = raw_rows.len();
        info!(import_id = %import_id, total_rows, "文件解析完成");

        // === 步骤 2: 表头检查 + 行校验 ===
        debug!("步骤 2: 行校验");
        let missing = self.row_validator.missing_columns(&raw_rows);
        if !missing.is_empty() {
            let err = ImportError::MissingColumns(missing);
            error!(error = %err, "表头缺少必需列");
            return Err(err);
        }
        let validation = self.row_validator.validate_rows(&raw_rows);
        let valid_rows = validation.valid.len();
        info!(
            valid = valid_rows,
            invalid = validation.invalid_count(),
            "行校验完成"
        );

        // === 步骤 3: 分类树加载 ===
        debug!("步骤 3: 分类树加载");
        let resolver = TaxonomyResolver::load(&self.taxonomy_source).await?;

        // === 步骤 4: 分批落库 ===
        debug!("步骤 4: 分批落库");
        let persister = BatchPersister::new(self.batch_size().await?);
        let outcome = persister
            .persist(
                &self.item_store,
                &resolver,
                user_id,
                validation.valid,
                &validation.row_numbers,
                self.reporter.as_ref(),
            )
            .await;

        let report = ImportReport {
            import_id,
            total_rows,
            valid_rows,
            validation_errors: validation.errors,
            batches: outcome.batches,
            succeeded: outcome.succeeded,
            failed: outcome.failed,
            failures: outcome.failures,
            elapsed_ms: started.elapsed().as_millis() as i64,
        };

        let succeeded = report.succeeded.to_string();
        let failed = report.failed.to_string();
        let invalid = report.validation_errors.len().to_string();
        info!(
            import_id = %report.import_id,
            elapsed_ms = report.elapsed_ms,
            "{}",
            t_with_args(
                "import.summary",
                &[
                    ("succeeded", succeeded.as_str()),
                    ("failed", failed.as_str()),
                    ("invalid", invalid.as_str()),
                ]
            )
        );

        Ok(report)
    }
}

#[async_trait]
impl<S, T, C> ItemImporter for ItemImporterImpl<S, T, C>
where
    S: ItemStore,
    T: TaxonomySource,
    C: ImportConfigReader,
{
    #[instrument(skip(self, file_path), fields(import_id))]
    async fn import_file(&self, user_id: i64, file_path: &Path) -> ImportResult<ImportReport> {
        let started = Instant::now();
        let import_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("import_id", import_id.as_str());
        info!(import_id = %import_id, file_path = %file_path.display(), "开始导入物品数据");

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let raw_rows = self.file_parser.parse(file_path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;

        self.run(import_id, user_id, raw_rows, started).await
    }

    #[instrument(skip(self, bytes), fields(import_id, size = bytes.len()))]
    async fn import_bytes(&self, user_id: i64, bytes: &[u8], extension: &str) -> ImportResult<ImportReport> {
        let started = Instant::now();
        let import_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("import_id", import_id.as_str());
        info!(import_id = %import_id, extension, "开始导入上传内容");

        let raw_rows = self.file_parser.parse_bytes(bytes, extension).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;

        self.run(import_id, user_id, raw_rows, started).await
    }
}
