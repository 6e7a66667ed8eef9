// ==========================================
// 库存资产管理系统 - 用户（租户）
// ==========================================
// 物品/包裹/行动均按 user_id 隔离
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
