// ==========================================
// 库存资产管理系统 - 行动数据仓储
// ==========================================
// 表: operations / operation_items
// 明细按 line_kind 分成物品行与包裹行两组读取
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::operation::{
    NewOperation, Operation, OperationItemLine, OperationLineTarget, OperationPackageLine,
    OperationWithLines,
};
use crate::domain::package::PackageWithItems;
use crate::domain::types::EntityKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::package_repo::{ensure_item_owned, load_package_items, query_owned_package};
use crate::repository::row_mapping::{
    image_from_columns, item_summary_at, item_summary_joins, lock_conn, ITEM_SUMMARY_COLUMNS,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const OPERATION_COLUMNS: &str = r#"
    id, user_id, name, description, year, location, active, start_date, end_date,
    image_url, image_key, created_at, updated_at
"#;

// ==========================================
// OperationRepository - 行动仓储
// ==========================================
pub struct OperationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OperationRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        lock_conn(&self.conn)
    }

    /// 创建行动及其明细（单事务）
    ///
    /// 明细引用的物品/包裹必须属于同一用户
    pub fn create(&self, operation: &NewOperation) -> RepositoryResult<i64> {
        let lines = operation.validated_lines()?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let now = Utc::now();
        tx.execute(
            r#"
            INSERT INTO operations (
                user_id, name, description, year, location, active, start_date, end_date,
                image_url, image_key, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            "#,
            params![
                operation.user_id,
                operation.name,
                operation.description,
                operation.year,
                operation.location,
                operation.active,
                operation.start_date,
                operation.end_date,
                operation.image.as_ref().map(|img| img.url.clone()),
                operation.image.as_ref().and_then(|img| img.storage_key.clone()),
                now,
            ],
        )?;
        let operation_id = tx.last_insert_rowid();

        for (position, (target, quantity)) in lines.iter().enumerate() {
            let (kind, item_id, package_id) = match *target {
                OperationLineTarget::Item(item_id) => {
                    ensure_item_owned(&tx, operation.user_id, item_id)?;
                    ("ITEM", Some(item_id), None)
                }
                OperationLineTarget::Package(package_id) => {
                    if query_owned_package(&tx, operation.user_id, package_id)?.is_none() {
                        return Err(RepositoryError::NotFound {
                            entity: EntityKind::Package,
                            id: package_id,
                        });
                    }
                    ("PACKAGE", None, Some(package_id))
                }
            };
            tx.execute(
                r#"
                INSERT INTO operation_items (operation_id, line_kind, item_id, package_id, quantity, position)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![operation_id, kind, item_id, package_id, quantity, position as i64],
            )?;
        }

        tx.commit()?;
        Ok(operation_id)
    }

    pub fn find_owned(&self, user_id: i64, id: i64) -> RepositoryResult<Option<Operation>> {
        let conn = self.get_conn()?;
        query_owned_operation(&conn, user_id, id)
    }

    /// 按 id 查询表头 + 全部明细（限定归属用户）
    pub fn find_owned_with_lines(&self, user_id: i64, id: i64) -> RepositoryResult<Option<OperationWithLines>> {
        let conn = self.get_conn()?;
        let Some(operation) = query_owned_operation(&conn, user_id, id)? else {
            return Ok(None);
        };
        let (items, packages) = load_operation_lines(&conn, operation.id)?;
        Ok(Some(OperationWithLines {
            operation,
            items,
            packages,
        }))
    }

    pub fn list_by_owner(&self, user_id: i64) -> RepositoryResult<Vec<Operation>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM operations WHERE user_id = ?1 ORDER BY id", OPERATION_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let operations = stmt
            .query_map(params![user_id], map_operation)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(operations)
    }

    pub fn delete(&self, user_id: i64, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM operations WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: EntityKind::Operation,
                id,
            });
        }
        Ok(())
    }
}

// ==========================================
// 共享查询
// ==========================================

pub(crate) fn query_owned_operation(conn: &Connection, user_id: i64, id: i64) -> RepositoryResult<Option<Operation>> {
    let sql = format!("SELECT {} FROM operations WHERE id = ?1 AND user_id = ?2", OPERATION_COLUMNS);
    let operation = conn
        .query_row(&sql, params![id, user_id], map_operation)
        .optional()?;
    Ok(operation)
}

/// 加载行动明细: (物品行, 包裹行),各自按 position 排序
pub(crate) fn load_operation_lines(
    conn: &Connection,
    operation_id: i64,
) -> RepositoryResult<(Vec<OperationItemLine>, Vec<OperationPackageLine>)> {
    let item_sql = format!(
        "SELECT oi.id, oi.operation_id, oi.quantity, {} FROM operation_items oi {} \
         WHERE oi.operation_id = ?1 AND oi.line_kind = 'ITEM' ORDER BY oi.position, oi.id",
        ITEM_SUMMARY_COLUMNS,
        item_summary_joins("oi.item_id")
    );
    let mut stmt = conn.prepare(&item_sql)?;
    let items = stmt
        .query_map(params![operation_id], |row| {
            Ok(OperationItemLine {
                id: row.get(0)?,
                operation_id: row.get(1)?,
                quantity: row.get(2)?,
                item: item_summary_at(row, 3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        r#"
        SELECT oi.id, oi.operation_id, oi.quantity, oi.package_id, o.user_id
        FROM operation_items oi
        JOIN operations o ON o.id = oi.operation_id
        WHERE oi.operation_id = ?1 AND oi.line_kind = 'PACKAGE'
        ORDER BY oi.position, oi.id
        "#,
    )?;
    let raw_lines = stmt
        .query_map(params![operation_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut packages = Vec::with_capacity(raw_lines.len());
    for (id, operation_id, quantity, package_id, user_id) in raw_lines {
        let package = match package_id {
            Some(package_id) => match query_owned_package(conn, user_id, package_id)? {
                Some(package) => {
                    let items = load_package_items(conn, package.id)?;
                    Some(PackageWithItems { package, items })
                }
                None => None,
            },
            None => None,
        };
        packages.push(OperationPackageLine {
            id,
            operation_id,
            package,
            quantity,
        });
    }

    Ok((items, packages))
}

fn map_operation(row: &Row<'_>) -> rusqlite::Result<Operation> {
    Ok(Operation {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        year: row.get(4)?,
        location: row.get(5)?,
        active: row.get(6)?,
        start_date: row.get(7)?,
        end_date: row.get(8)?,
        image: image_from_columns(row.get(9)?, row.get(10)?),
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}
