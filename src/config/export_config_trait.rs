// ==========================================
// 库存资产管理系统 - 导出配置读取 Trait
// ==========================================

use async_trait::async_trait;
use std::error::Error;

#[async_trait]
pub trait ExportConfigReader: Send + Sync {
    /// 调用方未指定时是否包含明细（默认 true）
    async fn get_default_include_details(&self) -> Result<bool, Box<dyn Error>>;

    /// 导出文件名前缀（默认 inventory-export）
    async fn get_file_prefix(&self) -> Result<String, Box<dyn Error>>;
}
