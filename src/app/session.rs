// ==========================================
// 库存资产管理系统 - 当前用户
// ==========================================
// 所有导入导出都以"当前登录用户"为归属边界
// ==========================================

/// 当前登录用户读取接口
pub trait CurrentUserProvider: Send + Sync {
    /// 未登录时返回 None
    fn current_user_id(&self) -> Option<i64>;
}

/// 固定用户（CLI `--user` 指定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedUser(pub i64);

impl CurrentUserProvider for FixedUser {
    fn current_user_id(&self) -> Option<i64> {
        Some(self.0)
    }
}

/// 未登录
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CurrentUserProvider for Anonymous {
    fn current_user_id(&self) -> Option<i64> {
        None
    }
}
