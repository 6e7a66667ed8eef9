// ==========================================
// 库存资产管理系统 - 三级分类模型
// ==========================================
// 结构: Category 1→N Family 1→N SubFamily
// 用途: 导入时按名称解析,其余场景按 id 引用
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubFamily {
    pub id: i64,
    pub family_id: i64,
    pub name: String,
}

// ==========================================
// TaxonomyTree - 预加载的分类树
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyTree {
    pub categories: Vec<CategoryNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    pub families: Vec<FamilyNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyNode {
    pub id: i64,
    pub name: String,
    pub sub_families: Vec<SubFamily>,
}

/// 解析成功后的三级 id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyIds {
    pub category_id: i64,
    pub family_id: i64,
    pub sub_family_id: i64,
}

impl TaxonomyTree {
    /// 由三张平铺列表组装分类树
    ///
    /// 找不到父节点的 family/subFamily 被丢弃（数据库外键保证不会出现）
    pub fn build(categories: Vec<Category>, families: Vec<Family>, sub_families: Vec<SubFamily>) -> Self {
        let mut subs_by_family: HashMap<i64, Vec<SubFamily>> = HashMap::new();
        for sub in sub_families {
            subs_by_family.entry(sub.family_id).or_default().push(sub);
        }

        let mut families_by_category: HashMap<i64, Vec<FamilyNode>> = HashMap::new();
        for family in families {
            let sub_families = subs_by_family.remove(&family.id).unwrap_or_default();
            families_by_category
                .entry(family.category_id)
                .or_default()
                .push(FamilyNode {
                    id: family.id,
                    name: family.name,
                    sub_families,
                });
        }

        let categories = categories
            .into_iter()
            .map(|category| CategoryNode {
                families: families_by_category.remove(&category.id).unwrap_or_default(),
                id: category.id,
                name: category.name,
            })
            .collect();

        Self { categories }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_nests_by_parent_id() {
        let tree = TaxonomyTree::build(
            vec![
                Category { id: 1, name: "Audio".into() },
                Category { id: 2, name: "Video".into() },
            ],
            vec![
                Family { id: 10, category_id: 1, name: "Mics".into() },
                Family { id: 20, category_id: 2, name: "Cameras".into() },
            ],
            vec![SubFamily { id: 100, family_id: 10, name: "Wireless".into() }],
        );

        assert_eq!(tree.categories.len(), 2);
        assert_eq!(tree.categories[0].families[0].name, "Mics");
        assert_eq!(tree.categories[0].families[0].sub_families[0].id, 100);
        assert!(tree.categories[1].families[0].sub_families.is_empty());
    }
}
