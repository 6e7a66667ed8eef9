// ==========================================
// 库存资产管理系统 - 物品领域模型
// ==========================================
// 用途: 导入层写入,导出层只读
// 对齐: items 表
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Dimensions - 外形尺寸
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

// ==========================================
// ImageRef - 单张图片引用
// ==========================================
// 每个实体最多一张图片,显式建模为 Option<ImageRef>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub storage_key: Option<String>,
}

// ==========================================
// Item - 物品
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    // ===== 主键与归属 =====
    pub id: i64,
    pub user_id: i64,

    // ===== 基础信息 =====
    pub name: String,
    pub description: Option<String>,
    pub brand: String,
    pub hs_code: String,
    pub location: String,

    // ===== 价值 =====
    pub value: f64,           // 单价（货币，≥0）
    pub insurance_value: f64, // 保险价值（≥0）

    // ===== 物理属性 =====
    pub dimensions: Dimensions,
    pub weight: f64,
    pub quantity: i64,

    // ===== 分类（严格三级链） =====
    pub category_id: i64,
    pub family_id: i64,
    pub sub_family_id: i64,

    pub image: Option<ImageRef>,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// NewItem - 物品写入参数
// ==========================================
// 来源: 导入管道（ResolvedRow）或物品表单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub brand: String,
    pub hs_code: String,
    pub location: String,
    pub value: f64,
    pub insurance_value: f64,
    pub dimensions: Dimensions,
    pub weight: f64,
    pub quantity: i64,
    pub category_id: i64,
    pub family_id: i64,
    pub sub_family_id: i64,
    pub image: Option<ImageRef>,
}

impl NewItem {
    /// 校验领域不变量（写库前最后一道检查）
    ///
    /// # 返回
    /// - Ok(()): 全部满足
    /// - Err(DomainError): 第一个违反的不变量
    pub fn check_invariants(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyField {
                field: "name".to_string(),
            });
        }

        let amounts = [
            ("value", self.value),
            ("insuranceValue", self.insurance_value),
            ("length", self.dimensions.length),
            ("width", self.dimensions.width),
            ("height", self.dimensions.height),
            ("weight", self.weight),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::NegativeAmount {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.quantity <= 0 {
            return Err(DomainError::NonPositiveQuantity(self.quantity));
        }

        Ok(())
    }
}

// ==========================================
// ItemSummary - 导出用物品快照
// ==========================================
// 包裹/行动明细通过此结构携带物品及其分类名称
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub hs_code: String,
    pub value: f64,
    pub category_name: String,
    pub family_name: String,
    pub sub_family_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> NewItem {
        NewItem {
            user_id: 1,
            name: "Camera".to_string(),
            description: None,
            brand: "Acme".to_string(),
            hs_code: "8525".to_string(),
            location: "Shelf A".to_string(),
            value: 120.0,
            insurance_value: 150.0,
            dimensions: Dimensions {
                length: 10.0,
                width: 5.0,
                height: 4.0,
            },
            weight: 0.8,
            quantity: 1,
            category_id: 1,
            family_id: 1,
            sub_family_id: 1,
            image: None,
        }
    }

    #[test]
    fn test_check_invariants_ok() {
        assert!(sample_item().check_invariants().is_ok());
    }

    #[test]
    fn test_check_invariants_negative_value() {
        let mut item = sample_item();
        item.value = -1.0;
        assert!(matches!(
            item.check_invariants(),
            Err(DomainError::NegativeAmount { ref field, .. }) if field == "value"
        ));
    }

    #[test]
    fn test_check_invariants_zero_quantity() {
        let mut item = sample_item();
        item.quantity = 0;
        assert_eq!(
            item.check_invariants(),
            Err(DomainError::NonPositiveQuantity(0))
        );
    }
}
