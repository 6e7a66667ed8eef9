// ==========================================
// 库存资产管理系统 - 物品数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有读写按 user_id 隔离
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::item::{Dimensions, Item, NewItem};
use crate::domain::types::EntityKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::import_store::ItemStore;
use crate::repository::row_mapping::{image_from_columns, lock_conn};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const ITEM_COLUMNS: &str = r#"
    id, user_id, name, description, brand, value, insurance_value, hs_code, location,
    length, width, height, weight, quantity, category_id, family_id, sub_family_id,
    image_url, image_key, created_at, updated_at
"#;

// ==========================================
// ItemRepository - 物品仓储
// ==========================================
pub struct ItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ItemRepository {
    /// 创建新的 ItemRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        lock_conn(&self.conn)
    }

    /// 创建物品
    ///
    /// 分类链校验与插入在同一事务内完成
    pub fn create(&self, item: &NewItem) -> RepositoryResult<i64> {
        item.check_invariants()?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        check_taxonomy_chain(&tx, item)?;
        let id = insert_item(&tx, item)?;
        tx.commit()?;
        Ok(id)
    }

    /// 批量创建物品（单事务,任一失败整体回滚）
    ///
    /// # 返回
    /// - Ok(usize): 插入条数
    pub fn create_many(&self, items: &[NewItem]) -> RepositoryResult<usize> {
        for item in items {
            item.check_invariants()?;
        }

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        for item in items {
            check_taxonomy_chain(&tx, item)?;
            insert_item(&tx, item)?;
        }
        tx.commit()?;
        Ok(items.len())
    }

    /// 按 id 查询（限定归属用户）
    pub fn find_owned(&self, user_id: i64, id: i64) -> RepositoryResult<Option<Item>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM items WHERE id = ?1 AND user_id = ?2", ITEM_COLUMNS);
        let item = conn
            .query_row(&sql, params![id, user_id], map_item)
            .optional()?;
        Ok(item)
    }

    /// 查询用户全部物品（按 id 升序）
    pub fn list_by_owner(&self, user_id: i64) -> RepositoryResult<Vec<Item>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM items WHERE user_id = ?1 ORDER BY id", ITEM_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![user_id], map_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn count_by_owner(&self, user_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM items WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// 更新物品（整行覆盖,归属不可变）
    pub fn update(&self, user_id: i64, id: i64, item: &NewItem) -> RepositoryResult<()> {
        item.check_invariants()?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        check_taxonomy_chain(&tx, item)?;
        let affected = tx.execute(
            r#"
            UPDATE items SET
                name = ?3, description = ?4, brand = ?5, value = ?6, insurance_value = ?7,
                hs_code = ?8, location = ?9, length = ?10, width = ?11, height = ?12,
                weight = ?13, quantity = ?14, category_id = ?15, family_id = ?16,
                sub_family_id = ?17, image_url = ?18, image_key = ?19, updated_at = ?20
            WHERE id = ?1 AND user_id = ?2
            "#,
            params![
                id,
                user_id,
                item.name,
                item.description,
                item.brand,
                item.value,
                item.insurance_value,
                item.hs_code,
                item.location,
                item.dimensions.length,
                item.dimensions.width,
                item.dimensions.height,
                item.weight,
                item.quantity,
                item.category_id,
                item.family_id,
                item.sub_family_id,
                item.image.as_ref().map(|img| img.url.clone()),
                item.image.as_ref().and_then(|img| img.storage_key.clone()),
                Utc::now(),
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: EntityKind::Item,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }

    /// 删除物品
    ///
    /// 包裹/行动明细不级联删除,引用置空
    pub fn delete(&self, user_id: i64, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM items WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: EntityKind::Item,
                id,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ItemStore for ItemRepository {
    async fn create_item(&self, item: &NewItem) -> RepositoryResult<i64> {
        self.create(item)
    }
}

/// 校验 subFamily → family → category 链
fn check_taxonomy_chain(conn: &Connection, item: &NewItem) -> RepositoryResult<()> {
    let chained: Option<i64> = conn
        .query_row(
            r#"
            SELECT 1 FROM sub_families s
            JOIN families f ON f.id = s.family_id
            WHERE s.id = ?1 AND f.id = ?2 AND f.category_id = ?3
            "#,
            params![item.sub_family_id, item.family_id, item.category_id],
            |row| row.get(0),
        )
        .optional()?;

    match chained {
        Some(_) => Ok(()),
        None => Err(RepositoryError::TaxonomyChainMismatch {
            category_id: item.category_id,
            family_id: item.family_id,
            sub_family_id: item.sub_family_id,
        }),
    }
}

fn insert_item(conn: &Connection, item: &NewItem) -> RepositoryResult<i64> {
    let now = Utc::now();
    conn.execute(
        r#"
        INSERT INTO items (
            user_id, name, description, brand, value, insurance_value, hs_code, location,
            length, width, height, weight, quantity, category_id, family_id, sub_family_id,
            image_url, image_key, created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?19
        )
        "#,
        params![
            item.user_id,
            item.name,
            item.description,
            item.brand,
            item.value,
            item.insurance_value,
            item.hs_code,
            item.location,
            item.dimensions.length,
            item.dimensions.width,
            item.dimensions.height,
            item.weight,
            item.quantity,
            item.category_id,
            item.family_id,
            item.sub_family_id,
            item.image.as_ref().map(|img| img.url.clone()),
            item.image.as_ref().and_then(|img| img.storage_key.clone()),
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn map_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        brand: row.get(4)?,
        value: row.get(5)?,
        insurance_value: row.get(6)?,
        hs_code: row.get(7)?,
        location: row.get(8)?,
        dimensions: Dimensions {
            length: row.get(9)?,
            width: row.get(10)?,
            height: row.get(11)?,
        },
        weight: row.get(12)?,
        quantity: row.get(13)?,
        category_id: row.get(14)?,
        family_id: row.get(15)?,
        sub_family_id: row.get(16)?,
        image: image_from_columns(row.get(17)?, row.get(18)?),
        created_at: row.get(19)?,
        updated_at: row.get(20)?,
    })
}
