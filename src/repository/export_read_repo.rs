// ==========================================
// 库存资产管理系统 - 导出读取仓储
// ==========================================
// 只读,复用行动/包裹仓储的共享查询
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::export::{OperationRecord, PackageRecord};
use crate::domain::operation::OperationWithLines;
use crate::domain::package::PackageWithItems;
use crate::repository::error::RepositoryResult;
use crate::repository::export_source::ExportSource;
use crate::repository::operation_repo::{load_operation_lines, query_owned_operation};
use crate::repository::package_repo::{load_package_items, query_owned_package};
use crate::repository::row_mapping::lock_conn;
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub struct ExportReadRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ExportReadRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn read_operation(
        &self,
        user_id: i64,
        operation_id: i64,
        include_details: bool,
    ) -> RepositoryResult<Option<OperationRecord>> {
        let conn = lock_conn(&self.conn)?;
        let Some(operation) = query_owned_operation(&conn, user_id, operation_id)? else {
            return Ok(None);
        };
        if !include_details {
            return Ok(Some(OperationRecord::Header(operation)));
        }

        let (items, packages) = load_operation_lines(&conn, operation.id)?;
        Ok(Some(OperationRecord::Detailed(OperationWithLines {
            operation,
            items,
            packages,
        })))
    }

    fn read_package(
        &self,
        user_id: i64,
        package_id: i64,
        include_details: bool,
    ) -> RepositoryResult<Option<PackageRecord>> {
        let conn = lock_conn(&self.conn)?;
        let Some(package) = query_owned_package(&conn, user_id, package_id)? else {
            return Ok(None);
        };
        if !include_details {
            return Ok(Some(PackageRecord::Header(package)));
        }

        let items = load_package_items(&conn, package.id)?;
        Ok(Some(PackageRecord::Detailed(PackageWithItems { package, items })))
    }
}

#[async_trait]
impl ExportSource for ExportReadRepository {
    async fn fetch_operation(
        &self,
        user_id: i64,
        operation_id: i64,
        include_details: bool,
    ) -> RepositoryResult<Option<OperationRecord>> {
        self.read_operation(user_id, operation_id, include_details)
    }

    async fn fetch_package(
        &self,
        user_id: i64,
        package_id: i64,
        include_details: bool,
    ) -> RepositoryResult<Option<PackageRecord>> {
        self.read_package(user_id, package_id, include_details)
    }
}
