// ==========================================
// 库存资产管理系统 - 导入侧数据访问 Trait
// ==========================================
// 职责: 定义导入管道所需的数据访问接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::item::NewItem;
use crate::domain::taxonomy::{Category, Family, SubFamily};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ItemStore Trait
// ==========================================
// 用途: 批量落库时的单行写入
// 实现者: ItemRepository（使用 rusqlite）
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// 创建单个物品（独立原子操作）
    ///
    /// # 返回
    /// - Ok(i64): 新物品 id
    /// - Err: 约束违反、分类层级不匹配、数据库错误
    async fn create_item(&self, item: &NewItem) -> RepositoryResult<i64>;
}

// ==========================================
// TaxonomySource Trait
// ==========================================
// 用途: 预加载分类树（三次读取互不依赖,可并发）
// 实现者: TaxonomyRepository
#[async_trait]
pub trait TaxonomySource: Send + Sync {
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>>;

    async fn list_families(&self) -> RepositoryResult<Vec<Family>>;

    async fn list_sub_families(&self) -> RepositoryResult<Vec<SubFamily>>;
}
