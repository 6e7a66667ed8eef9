// ==========================================
// 库存资产管理系统 - 用户数据仓储
// ==========================================
// 用户即租户边界,本仓储只提供最小读写
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::user::User;
use crate::repository::error::RepositoryResult;
use crate::repository::row_mapping::lock_conn;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 创建用户（email 唯一）
    pub fn create(&self, email: &str, name: &str) -> RepositoryResult<User> {
        let conn = lock_conn(&self.conn)?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO users (email, name, created_at) VALUES (?1, ?2, ?3)",
            params![email, name, created_at],
        )?;
        Ok(User {
            id: conn.last_insert_rowid(),
            email: email.to_string(),
            name: name.to_string(),
            created_at,
        })
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let conn = lock_conn(&self.conn)?;
        let user = conn
            .query_row(
                "SELECT id, email, name, created_at FROM users WHERE id = ?1",
                params![id],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let conn = lock_conn(&self.conn)?;
        let user = conn
            .query_row(
                "SELECT id, email, name, created_at FROM users WHERE email = ?1",
                params![email],
                map_user,
            )
            .optional()?;
        Ok(user)
    }
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        created_at: row.get(3)?,
    })
}
