// ==========================================
// 库存资产管理系统 - 关联读取器
// ==========================================
// 阶段 1: ExportSelection → FetchedSelection
// 约束:
// - 按当前用户过滤；不存在与不属于该用户返回同一个 NotFound
// - 所选记录并发读取,任一失败则整体失败（不产出部分结果）
// ==========================================

use crate::domain::export::{ExportSelection, FetchedSelection, OperationRecord, PackageRecord};
use crate::domain::types::EntityKind;
use crate::exporter::error::{ExportError, ExportResult};
use crate::repository::export_source::ExportSource;
use futures::future::join_all;
use tracing::{debug, warn};

pub struct RelationalFetcher<S: ExportSource> {
    source: S,
}

impl<S: ExportSource> RelationalFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn fetch_operation(
        &self,
        user_id: i64,
        operation_id: i64,
        include_details: bool,
    ) -> ExportResult<OperationRecord> {
        self.source
            .fetch_operation(user_id, operation_id, include_details)
            .await?
            .ok_or(ExportError::NotFound {
                entity: EntityKind::Operation,
                id: operation_id,
            })
    }

    pub async fn fetch_package(
        &self,
        user_id: i64,
        package_id: i64,
        include_details: bool,
    ) -> ExportResult<PackageRecord> {
        self.source
            .fetch_package(user_id, package_id, include_details)
            .await?
            .ok_or(ExportError::NotFound {
                entity: EntityKind::Package,
                id: package_id,
            })
    }

    /// 并发读取全部所选记录
    ///
    /// # 返回
    /// - Ok(FetchedSelection): 按 id 升序排列
    /// - Err(EmptySelection): 未选择任何记录
    /// - Err(FetchFailed): 汇总全部失败项
    pub async fn fetch_selection(
        &self,
        user_id: i64,
        selection: &ExportSelection,
        include_details: bool,
    ) -> ExportResult<FetchedSelection> {
        if selection.is_empty() {
            return Err(ExportError::EmptySelection);
        }

        let operation_reads = selection
            .operation_ids
            .iter()
            .map(|&id| self.fetch_operation(user_id, id, include_details));
        let package_reads = selection
            .package_ids
            .iter()
            .map(|&id| self.fetch_package(user_id, id, include_details));

        let (operation_results, package_results) =
            futures::join!(join_all(operation_reads), join_all(package_reads));

        let mut failures = Vec::new();
        let mut fetched = FetchedSelection::default();
        for result in operation_results {
            match result {
                Ok(record) => fetched.operations.push(record),
                Err(e) => failures.push(e),
            }
        }
        for result in package_results {
            match result {
                Ok(record) => fetched.packages.push(record),
                Err(e) => failures.push(e),
            }
        }

        if !failures.is_empty() {
            warn!(failed = failures.len(), "关联读取存在失败项");
            return Err(ExportError::FetchFailed(failures));
        }

        debug!(
            operations = fetched.operations.len(),
            packages = fetched.packages.len(),
            "关联读取完成"
        );
        Ok(fetched)
    }
}
