// ==========================================
// 库存资产管理系统 - 导出产物落地
// ==========================================
// 职责: 把 ExportArtifact 交给调用方选定的目的地
// ==========================================

use crate::domain::export::ExportArtifact;
use crate::exporter::error::ExportResult;
use crate::i18n::t_with_args;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// 保存产物,返回可供用户定位的位置
    async fn save(&self, artifact: &ExportArtifact) -> ExportResult<String>;
}

// ==========================================
// DirectorySink - 写入本地目录
// ==========================================
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn save(&self, artifact: &ExportArtifact) -> ExportResult<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&artifact.file_name);
        tokio::fs::write(&path, &artifact.bytes).await?;

        let location = path.display().to_string();
        info!(
            bytes = artifact.bytes.len(),
            "{}",
            t_with_args("export.saved", &[("path", location.as_str())])
        );
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_sink_creates_missing_dir() {
        let root = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(root.path().join("exports").join("2026"));
        let artifact = ExportArtifact {
            file_name: "inventory-export-2026-05-01.csv".to_string(),
            mime_type: "text/csv;charset=utf-8;".to_string(),
            bytes: b"Type\nMETADATA\n".to_vec(),
        };

        let location = sink.save(&artifact).await.unwrap();

        assert!(location.ends_with("inventory-export-2026-05-01.csv"));
        assert_eq!(std::fs::read(&location).unwrap(), artifact.bytes);
    }
}
