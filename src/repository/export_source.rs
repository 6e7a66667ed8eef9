// ==========================================
// 库存资产管理系统 - 导出侧数据访问 Trait
// ==========================================
// 职责: 按归属用户读取行动/包裹（可选带明细）
// 约束: 不存在与不属于当前用户必须返回相同结果（None）
// ==========================================

use crate::domain::export::{OperationRecord, PackageRecord};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait ExportSource: Send + Sync {
    /// 读取单个行动
    ///
    /// # 参数
    /// - include_details: true 时连同物品行、包裹行（含包裹自身明细）一并读取
    ///
    /// # 返回
    /// - Ok(None): 不存在或不属于该用户
    async fn fetch_operation(
        &self,
        user_id: i64,
        operation_id: i64,
        include_details: bool,
    ) -> RepositoryResult<Option<OperationRecord>>;

    /// 读取单个包裹
    async fn fetch_package(
        &self,
        user_id: i64,
        package_id: i64,
        include_details: bool,
    ) -> RepositoryResult<Option<PackageRecord>>;
}
