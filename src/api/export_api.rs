// ==========================================
// 库存资产管理系统 - 库存导出API
// ==========================================
// 职责: 补全导出选项（配置默认值）→ 导出 → 交给落地目的地
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ExportConfigReader};
use crate::domain::export::{ExportArtifact, ExportOptions, ExportSelection};
use crate::domain::types::ExportFormat;
use crate::exporter::{ArtifactSink, InventoryExporter, TemplateBuilder};
use crate::repository::ExportReadRepository;
use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// 已保存文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFile {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
    /// 落地位置（由 ArtifactSink 决定）
    pub location: String,
}

impl SavedFile {
    fn new(artifact: &ExportArtifact, location: String) -> Self {
        Self {
            file_name: artifact.file_name.clone(),
            mime_type: artifact.mime_type.clone(),
            size_bytes: artifact.bytes.len(),
            location,
        }
    }
}

/// 导出API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportApiResponse {
    pub file: SavedFile,
    pub operations: usize,
    pub packages: usize,
    pub include_details: bool,
    /// RFC 3339 (UTC)
    pub generated_at: String,
}

/// 导出API
pub struct ExportApi {
    conn: Arc<Mutex<Connection>>,
}

impl ExportApi {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn config(&self) -> ApiResult<ConfigManager> {
        ConfigManager::from_connection(self.conn.clone())
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 组装导出选项（未指定 include_details 时读配置）
    async fn resolve_options(
        &self,
        format: ExportFormat,
        include_details: Option<bool>,
    ) -> ApiResult<ExportOptions> {
        let config = self.config()?;

        let include_details = match include_details {
            Some(flag) => flag,
            None => config
                .get_default_include_details()
                .await
                .map_err(|e| ApiError::ConfigError(e.to_string()))?,
        };
        let file_prefix = config
            .get_file_prefix()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let mut options = ExportOptions::new(format, include_details, Utc::now());
        options.file_prefix = file_prefix;
        Ok(options)
    }

    /// 导出所选行动/包裹并保存
    ///
    /// # 参数
    /// - user_id: 当前登录用户（只能导出自己的记录）
    /// - selection: 勾选集合
    /// - include_details: None 表示使用配置默认值
    /// - sink: 保存目的地
    pub async fn export_inventory(
        &self,
        user_id: i64,
        selection: &ExportSelection,
        format: ExportFormat,
        include_details: Option<bool>,
        sink: &dyn ArtifactSink,
    ) -> ApiResult<ExportApiResponse> {
        let options = self.resolve_options(format, include_details).await?;

        let exporter = InventoryExporter::new(ExportReadRepository::from_connection(self.conn.clone()));
        let artifact = exporter.export(user_id, selection, &options).await?;
        let location = sink.save(&artifact).await?;

        Ok(ExportApiResponse {
            file: SavedFile::new(&artifact, location),
            operations: selection.operation_ids.len(),
            packages: selection.package_ids.len(),
            include_details: options.include_details,
            generated_at: options
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }

    /// 下载导入模板
    pub async fn download_template(
        &self,
        format: ExportFormat,
        sink: &dyn ArtifactSink,
    ) -> ApiResult<SavedFile> {
        let artifact = TemplateBuilder.build(format)?;
        let location = sink.save(&artifact).await?;
        Ok(SavedFile::new(&artifact, location))
    }
}
