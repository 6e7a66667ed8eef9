// ==========================================
// 库存资产管理系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取落库批次大小
    ///
    /// # 返回
    /// - usize: 每批行数（≥1）
    ///
    /// # 默认值
    /// - 10（缺失、非数字或为 0 时）
    async fn get_batch_size(&self) -> Result<usize, Box<dyn Error>>;
}
