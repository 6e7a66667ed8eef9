// ==========================================
// 库存资产管理系统 - 库存导出器
// ==========================================
// 职责: 整合导出流程
// 流程: 关联读取 → 平铺 → 工作簿/CSV → ExportArtifact
// ==========================================

use crate::domain::export::{ExportArtifact, ExportOptions, ExportSelection, ExportTables};
use crate::domain::types::ExportFormat;
use crate::exporter::csv_builder::CsvBuilder;
use crate::exporter::error::ExportResult;
use crate::exporter::fetcher::RelationalFetcher;
use crate::exporter::flattener::RowFlattener;
use crate::exporter::workbook::WorkbookBuilder;
use crate::repository::export_source::ExportSource;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

// ==========================================
// InventoryExporter - 库存导出器
// ==========================================
pub struct InventoryExporter<S: ExportSource> {
    fetcher: RelationalFetcher<S>,
    flattener: RowFlattener,
}

impl<S: ExportSource> InventoryExporter<S> {
    pub fn new(source: S) -> Self {
        Self {
            fetcher: RelationalFetcher::new(source),
            flattener: RowFlattener,
        }
    }

    /// 导出所选行动/包裹
    ///
    /// # 返回
    /// - Ok(ExportArtifact): 文件名 `<prefix>-<YYYY-MM-DD>.<ext>`
    /// - Err(EmptySelection / FetchFailed / 生成失败): 不产出任何文件
    #[instrument(skip(self, selection, options), fields(export_id, format = %options.format))]
    pub async fn export(
        &self,
        user_id: i64,
        selection: &ExportSelection,
        options: &ExportOptions,
    ) -> ExportResult<ExportArtifact> {
        let started = Instant::now();
        let export_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("export_id", export_id.as_str());
        info!(
            export_id = %export_id,
            operations = selection.operation_ids.len(),
            packages = selection.package_ids.len(),
            include_details = options.include_details,
            "开始导出"
        );

        // === 步骤 1: 关联读取 ===
        debug!("步骤 1: 关联读取");
        let fetched = self
            .fetcher
            .fetch_selection(user_id, selection, options.include_details)
            .await
            .map_err(|e| {
                error!(error = %e, "关联读取失败");
                e
            })?;

        // === 步骤 2: 平铺 ===
        debug!("步骤 2: 平铺");
        let tables = self.flattener.flatten(&fetched);

        // === 步骤 3: 生成文件 ===
        debug!("步骤 3: 生成文件");
        let artifact = render(&tables, options)?;

        info!(
            export_id = %export_id,
            file_name = %artifact.file_name,
            bytes = artifact.bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as i64,
            "导出完成"
        );
        Ok(artifact)
    }
}

/// 纯函数: 平铺行 → 产物（同输入同输出）
pub fn render(tables: &ExportTables, options: &ExportOptions) -> ExportResult<ExportArtifact> {
    let bytes = match options.format {
        ExportFormat::Xlsx => WorkbookBuilder.build(tables, options)?,
        ExportFormat::Csv => CsvBuilder.build(tables, options)?,
    };

    Ok(ExportArtifact {
        file_name: options.file_name(),
        mime_type: options.format.mime_type().to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::export::{OperationRecord, PackageRecord};
    use crate::domain::package::Package;
    use crate::exporter::error::ExportError;
    use crate::repository::error::RepositoryResult;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    struct PackagesOnly;

    #[async_trait]
    impl ExportSource for PackagesOnly {
        async fn fetch_operation(
            &self,
            _user_id: i64,
            _operation_id: i64,
            _include_details: bool,
        ) -> RepositoryResult<Option<OperationRecord>> {
            Ok(None)
        }

        async fn fetch_package(
            &self,
            user_id: i64,
            package_id: i64,
            _include_details: bool,
        ) -> RepositoryResult<Option<PackageRecord>> {
            let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
            Ok(Some(PackageRecord::Header(Package {
                id: package_id,
                user_id,
                name: format!("pkg-{}", package_id),
                description: None,
                year: Some(2026),
                location: None,
                active: true,
                image: None,
                created_at: at,
                updated_at: at,
            })))
        }
    }

    fn options(format: ExportFormat) -> ExportOptions {
        ExportOptions::new(format, false, Utc.with_ymd_and_hms(2026, 3, 9, 15, 30, 0).unwrap())
    }

    #[tokio::test]
    async fn test_export_names_artifact_by_date() {
        let exporter = InventoryExporter::new(PackagesOnly);
        let selection = ExportSelection::default().with_package(3);

        let artifact = exporter
            .export(1, &selection, &options(ExportFormat::Csv))
            .await
            .unwrap();

        assert_eq!(artifact.file_name, "inventory-export-2026-03-09.csv");
        assert_eq!(artifact.mime_type, "text/csv;charset=utf-8;");
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.contains("PACKAGE"));
        assert!(text.contains("pkg-3"));
    }

    #[tokio::test]
    async fn test_missing_operation_fails_whole_export() {
        let exporter = InventoryExporter::new(PackagesOnly);
        let selection = ExportSelection::new([8], [3]);

        let result = exporter.export(1, &selection, &options(ExportFormat::Xlsx)).await;

        match result {
            Err(ExportError::FetchFailed(failures)) => assert_eq!(failures.len(), 1),
            other => panic!("expected FetchFailed, got {:?}", other.map(|a| a.file_name)),
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let tables = ExportTables::default();
        for format in [ExportFormat::Xlsx, ExportFormat::Csv] {
            let first = render(&tables, &options(format)).unwrap();
            let second = render(&tables, &options(format)).unwrap();
            assert_eq!(first, second);
        }
    }
}
