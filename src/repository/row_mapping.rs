// ==========================================
// 库存资产管理系统 - 仓储层公共映射
// ==========================================
// 职责: 连接加锁、图片列、物品快照列的统一读取
// ==========================================

use crate::domain::item::{ImageRef, ItemSummary};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 物品快照查询列（需配合 LEFT JOIN 别名 i/c/f/s 使用）
pub(crate) const ITEM_SUMMARY_COLUMNS: &str =
    "i.id, i.name, i.brand, i.hs_code, i.value, c.name, f.name, s.name";

/// 物品快照的 LEFT JOIN 片段（左表需提供 item_id 列）
pub(crate) fn item_summary_joins(item_id_column: &str) -> String {
    format!(
        "LEFT JOIN items i ON i.id = {} \
         LEFT JOIN categories c ON c.id = i.category_id \
         LEFT JOIN families f ON f.id = i.family_id \
         LEFT JOIN sub_families s ON s.id = i.sub_family_id",
        item_id_column
    )
}

/// 获取数据库连接
pub(crate) fn lock_conn(conn: &Arc<Mutex<Connection>>) -> RepositoryResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| RepositoryError::LockError(e.to_string()))
}

/// 从 (url, key) 两列还原单张图片
pub(crate) fn image_from_columns(url: Option<String>, key: Option<String>) -> Option<ImageRef> {
    url.map(|url| ImageRef {
        url,
        storage_key: key,
    })
}

/// 读取以 offset 开始的物品快照列；物品已删除时返回 None
pub(crate) fn item_summary_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Option<ItemSummary>> {
    let id: Option<i64> = row.get(offset)?;
    let Some(id) = id else {
        return Ok(None);
    };

    Ok(Some(ItemSummary {
        id,
        name: row.get(offset + 1)?,
        brand: row.get(offset + 2)?,
        hs_code: row.get(offset + 3)?,
        value: row.get(offset + 4)?,
        category_name: row.get::<_, Option<String>>(offset + 5)?.unwrap_or_default(),
        family_name: row.get::<_, Option<String>>(offset + 6)?.unwrap_or_default(),
        sub_family_name: row.get::<_, Option<String>>(offset + 7)?.unwrap_or_default(),
    }))
}
