// ==========================================
// 库存资产管理系统 - 包裹数据仓储
// ==========================================
// 表: packages / package_items
// 约束: 包裹只能装入同一用户的物品
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::package::{NewPackage, Package, PackageItem, PackageWithItems};
use crate::domain::types::EntityKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{
    image_from_columns, item_summary_at, item_summary_joins, lock_conn, ITEM_SUMMARY_COLUMNS,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const PACKAGE_COLUMNS: &str = r#"
    id, user_id, name, description, year, location, active, image_url, image_key,
    created_at, updated_at
"#;

// ==========================================
// PackageRepository - 包裹仓储
// ==========================================
pub struct PackageRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PackageRepository {
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

    /// 创建包裹及其明细（单事务）
    pub fn create(&self, package: &NewPackage) -> RepositoryResult<i64> {
        package.check_invariants()?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let now = Utc::now();
        tx.execute(
            r#"
            INSERT INTO packages (
                user_id, name, description, year, location, active, image_url, image_key,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
            params![
                package.user_id,
                package.name,
                package.description,
                package.year,
                package.location,
                package.active,
                package.image.as_ref().map(|img| img.url.clone()),
                package.image.as_ref().and_then(|img| img.storage_key.clone()),
                now,
            ],
        )?;
        let package_id = tx.last_insert_rowid();

        for (position, line) in package.items.iter().enumerate() {
            ensure_item_owned(&tx, package.user_id, line.item_id)?;
            tx.execute(
                "INSERT INTO package_items (package_id, item_id, quantity, position) VALUES (?1, ?2, ?3, ?4)",
                params![package_id, line.item_id, line.quantity, position as i64],
            )?;
        }

        tx.commit()?;
        Ok(package_id)
    }

    /// 按 id 查询表头（限定归属用户）
    pub fn find_owned(&self, user_id: i64, id: i64) -> RepositoryResult<Option<Package>> {
        let conn = self.get_conn()?;
        query_owned_package(&conn, user_id, id)
    }

    /// 按 id 查询表头 + 明细（限定归属用户）
    pub fn find_owned_with_items(&self, user_id: i64, id: i64) -> RepositoryResult<Option<PackageWithItems>> {
        let conn = self.get_conn()?;
        let Some(package) = query_owned_package(&conn, user_id, id)? else {
            return Ok(None);
        };
        let items = load_package_items(&conn, package.id)?;
        Ok(Some(PackageWithItems { package, items }))
    }

    pub fn list_by_owner(&self, user_id: i64) -> RepositoryResult<Vec<Package>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM packages WHERE user_id = ?1 ORDER BY id", PACKAGE_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let packages = stmt
            .query_map(params![user_id], map_package)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(packages)
    }

    /// 删除包裹（明细级联删除,行动中的引用置空）
    pub fn delete(&self, user_id: i64, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM packages WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: EntityKind::Package,
                id,
            });
        }
        Ok(())
    }
}

// ==========================================
// 共享查询（行动仓储与导出读取复用）
// ==========================================

pub(crate) fn query_owned_package(conn: &Connection, user_id: i64, id: i64) -> RepositoryResult<Option<Package>> {
    let sql = format!("SELECT {} FROM packages WHERE id = ?1 AND user_id = ?2", PACKAGE_COLUMNS);
    let package = conn
        .query_row(&sql, params![id, user_id], map_package)
        .optional()?;
    Ok(package)
}

/// 按 position 顺序加载包裹明细,物品已删除的行 item 为 None
pub(crate) fn load_package_items(conn: &Connection, package_id: i64) -> RepositoryResult<Vec<PackageItem>> {
    let sql = format!(
        "SELECT pi.id, pi.package_id, pi.quantity, {} FROM package_items pi {} \
         WHERE pi.package_id = ?1 ORDER BY pi.position, pi.id",
        ITEM_SUMMARY_COLUMNS,
        item_summary_joins("pi.item_id")
    );
    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(params![package_id], |row| {
            Ok(PackageItem {
                id: row.get(0)?,
                package_id: row.get(1)?,
                quantity: row.get(2)?,
                item: item_summary_at(row, 3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub(crate) fn ensure_item_owned(conn: &Connection, user_id: i64, item_id: i64) -> RepositoryResult<()> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM items WHERE id = ?1 AND user_id = ?2",
            params![item_id, user_id],
            |row| row.get(0),
        )
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(RepositoryError::NotFound {
            entity: EntityKind::Item,
            id: item_id,
        }),
    }
}

fn map_package(row: &Row<'_>) -> rusqlite::Result<Package> {
    Ok(Package {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        year: row.get(4)?,
        location: row.get(5)?,
        active: row.get(6)?,
        image: image_from_columns(row.get(7)?, row.get(8)?),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}
