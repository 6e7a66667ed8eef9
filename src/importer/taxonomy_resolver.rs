// ==========================================
// 库存资产管理系统 - 分类名称解析器
// ==========================================
// 阶段 2: (categoryName, familyName, subFamilyName) → TaxonomyIds
// 规则: 精确匹配,逐级收窄（family 只在已解析的 category 下查找）
// ==========================================

use crate::domain::import::ImportRow;
use crate::domain::taxonomy::{TaxonomyIds, TaxonomyTree};
use crate::domain::types::TaxonomyLevel;
use crate::importer::error::{ImportError, ImportResult, TaxonomyError};
use crate::repository::import_store::TaxonomySource;

pub struct TaxonomyResolver {
    tree: TaxonomyTree,
}

impl TaxonomyResolver {
    pub fn new(tree: TaxonomyTree) -> Self {
        Self { tree }
    }

    /// 并发读取三级分类并组装解析器
    pub async fn load<S: TaxonomySource + ?Sized>(source: &S) -> ImportResult<Self> {
        let (categories, families, sub_families) = tokio::try_join!(
            source.list_categories(),
            source.list_families(),
            source.list_sub_families()
        )
        .map_err(ImportError::TaxonomyLoadError)?;

        tracing::debug!(
            categories = categories.len(),
            families = families.len(),
            sub_families = sub_families.len(),
            "分类树加载完成"
        );
        Ok(Self::new(TaxonomyTree::build(categories, families, sub_families)))
    }

    pub fn tree(&self) -> &TaxonomyTree {
        &self.tree
    }

    /// 解析三级名称
    pub fn resolve(&self, category: &str, family: &str, sub_family: &str) -> Result<TaxonomyIds, TaxonomyError> {
        let category_node = unique_match(
            self.tree.categories.iter().filter(|c| c.name == category),
            TaxonomyLevel::Category,
            category,
        )?
        .ok_or_else(|| TaxonomyError::CategoryNotFound {
            category: category.to_string(),
        })?;

        let family_node = unique_match(
            category_node.families.iter().filter(|f| f.name == family),
            TaxonomyLevel::Family,
            family,
        )?
        .ok_or_else(|| TaxonomyError::FamilyNotFound {
            category: category.to_string(),
            family: family.to_string(),
        })?;

        let sub_family_node = unique_match(
            family_node.sub_families.iter().filter(|s| s.name == sub_family),
            TaxonomyLevel::SubFamily,
            sub_family,
        )?
        .ok_or_else(|| TaxonomyError::SubFamilyNotFound {
            category: category.to_string(),
            family: family.to_string(),
            sub_family: sub_family.to_string(),
        })?;

        Ok(TaxonomyIds {
            category_id: category_node.id,
            family_id: family_node.id,
            sub_family_id: sub_family_node.id,
        })
    }

    pub fn resolve_row(&self, row: &ImportRow) -> Result<TaxonomyIds, TaxonomyError> {
        self.resolve(&row.category_name, &row.family_name, &row.sub_family_name)
    }
}

/// 同级出现两个及以上同名节点视为歧义
fn unique_match<'a, T: 'a, I>(mut candidates: I, level: TaxonomyLevel, name: &str) -> Result<Option<&'a T>, TaxonomyError>
where
    I: Iterator<Item = &'a T>,
{
    let first = candidates.next();
    if first.is_some() && candidates.next().is_some() {
        return Err(TaxonomyError::Ambiguous {
            level,
            name: name.to_string(),
        });
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::taxonomy::{Category, Family, SubFamily};

    /// A/X/Leaf 与 B/X/Leaf 同名
    fn twin_tree() -> TaxonomyTree {
        TaxonomyTree::build(
            vec![
                Category { id: 1, name: "A".into() },
                Category { id: 2, name: "B".into() },
            ],
            vec![
                Family { id: 10, category_id: 1, name: "X".into() },
                Family { id: 20, category_id: 2, name: "X".into() },
            ],
            vec![
                SubFamily { id: 100, family_id: 10, name: "Leaf".into() },
                SubFamily { id: 200, family_id: 20, name: "Leaf".into() },
            ],
        )
    }

    #[test]
    fn test_resolution_is_scoped_by_parent() {
        let resolver = TaxonomyResolver::new(twin_tree());

        let a = resolver.resolve("A", "X", "Leaf").unwrap();
        assert_eq!(a, TaxonomyIds { category_id: 1, family_id: 10, sub_family_id: 100 });

        let b = resolver.resolve("B", "X", "Leaf").unwrap();
        assert_eq!(b, TaxonomyIds { category_id: 2, family_id: 20, sub_family_id: 200 });
    }

    #[test]
    fn test_distinct_not_found_errors() {
        let resolver = TaxonomyResolver::new(twin_tree());

        assert!(matches!(
            resolver.resolve("C", "X", "Leaf"),
            Err(TaxonomyError::CategoryNotFound { .. })
        ));
        assert!(matches!(
            resolver.resolve("A", "Y", "Leaf"),
            Err(TaxonomyError::FamilyNotFound { .. })
        ));
        assert!(matches!(
            resolver.resolve("A", "X", "Stem"),
            Err(TaxonomyError::SubFamilyNotFound { .. })
        ));
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let resolver = TaxonomyResolver::new(twin_tree());
        assert!(matches!(
            resolver.resolve("a", "X", "Leaf"),
            Err(TaxonomyError::CategoryNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_sibling_is_ambiguous() {
        let tree = TaxonomyTree::build(
            vec![
                Category { id: 1, name: "A".into() },
                Category { id: 2, name: "A".into() },
            ],
            vec![],
            vec![],
        );
        let resolver = TaxonomyResolver::new(tree);

        assert_eq!(
            resolver.resolve("A", "X", "Leaf"),
            Err(TaxonomyError::Ambiguous {
                level: TaxonomyLevel::Category,
                name: "A".to_string(),
            })
        );
    }
}
