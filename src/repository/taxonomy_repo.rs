// ==========================================
// 库存资产管理系统 - 分类数据仓储
// ==========================================
// 三张表: categories / families / sub_families
// 删除 category 经外键级联删除下属 family/subFamily
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::taxonomy::{Category, Family, SubFamily, TaxonomyTree};
use crate::domain::types::EntityKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::import_store::TaxonomySource;
use crate::repository::row_mapping::lock_conn;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct TaxonomyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TaxonomyRepository {
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

    // ==========================================
    // 写入
    // ==========================================

    pub fn create_category(&self, name: &str) -> RepositoryResult<Category> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
        Ok(Category {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// 创建 family（父 category 必须存在）
    pub fn create_family(&self, category_id: i64, name: &str) -> RepositoryResult<Family> {
        let conn = self.get_conn()?;
        ensure_exists(&conn, "categories", EntityKind::Category, category_id)?;
        conn.execute(
            "INSERT INTO families (category_id, name) VALUES (?1, ?2)",
            params![category_id, name],
        )?;
        Ok(Family {
            id: conn.last_insert_rowid(),
            category_id,
            name: name.to_string(),
        })
    }

    /// 创建 subFamily（父 family 必须存在）
    pub fn create_sub_family(&self, family_id: i64, name: &str) -> RepositoryResult<SubFamily> {
        let conn = self.get_conn()?;
        ensure_exists(&conn, "families", EntityKind::Family, family_id)?;
        conn.execute(
            "INSERT INTO sub_families (family_id, name) VALUES (?1, ?2)",
            params![family_id, name],
        )?;
        Ok(SubFamily {
            id: conn.last_insert_rowid(),
            family_id,
            name: name.to_string(),
        })
    }

    /// 删除 category（级联删除下属层级；仍被物品引用时返回外键错误）
    pub fn delete_category(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: EntityKind::Category,
                id,
            });
        }
        Ok(())
    }

    // ==========================================
    // 读取
    // ==========================================

    pub fn find_categories(&self) -> RepositoryResult<Vec<Category>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn find_families(&self) -> RepositoryResult<Vec<Family>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, category_id, name FROM families ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Family {
                    id: row.get(0)?,
                    category_id: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn find_sub_families(&self) -> RepositoryResult<Vec<SubFamily>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, family_id, name FROM sub_families ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SubFamily {
                    id: row.get(0)?,
                    family_id: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 一次性加载完整分类树
    pub fn load_tree(&self) -> RepositoryResult<TaxonomyTree> {
        Ok(TaxonomyTree::build(
            self.find_categories()?,
            self.find_families()?,
            self.find_sub_families()?,
        ))
    }
}

#[async_trait]
impl TaxonomySource for TaxonomyRepository {
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.find_categories()
    }

    async fn list_families(&self) -> RepositoryResult<Vec<Family>> {
        self.find_families()
    }

    async fn list_sub_families(&self) -> RepositoryResult<Vec<SubFamily>> {
        self.find_sub_families()
    }
}

fn ensure_exists(conn: &Connection, table: &str, entity: EntityKind, id: i64) -> RepositoryResult<()> {
    let sql = format!("SELECT 1 FROM {} WHERE id = ?1", table);
    let found: Option<i64> = conn.query_row(&sql, params![id], |row| row.get(0)).optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(RepositoryError::NotFound { entity, id }),
    }
}
