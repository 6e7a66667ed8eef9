// ==========================================
// 库存资产管理系统 - 行动领域模型
// ==========================================
// 对齐: operations / operation_items 表
// 红线: 每条明细必须且只能引用物品或包裹之一
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::item::{ImageRef, ItemSummary};
use crate::domain::package::PackageWithItems;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Operation - 行动表头（展会、运输等有时限的活动）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub location: Option<String>,
    pub active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub image: Option<ImageRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// OperationLineTarget - 明细引用目标
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum OperationLineTarget {
    Item(i64),
    Package(i64),
}

// ==========================================
// NewOperationLine - 表单层明细输入
// ==========================================
// item_id / package_id 两个可选字段由 target() 收敛为和类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewOperationLine {
    pub item_id: Option<i64>,
    pub package_id: Option<i64>,
    pub quantity: i64,
}

impl NewOperationLine {
    pub fn item(item_id: i64, quantity: i64) -> Self {
        Self {
            item_id: Some(item_id),
            package_id: None,
            quantity,
        }
    }

    pub fn package(package_id: i64, quantity: i64) -> Self {
        Self {
            item_id: None,
            package_id: Some(package_id),
            quantity,
        }
    }

    /// 恰好一个引用 + 数量为正
    pub fn target(&self) -> DomainResult<OperationLineTarget> {
        if self.quantity <= 0 {
            return Err(DomainError::NonPositiveQuantity(self.quantity));
        }
        match (self.item_id, self.package_id) {
            (Some(item_id), None) => Ok(OperationLineTarget::Item(item_id)),
            (None, Some(package_id)) => Ok(OperationLineTarget::Package(package_id)),
            (item_id, package_id) => Err(DomainError::InvalidLineTarget {
                item_id,
                package_id,
            }),
        }
    }
}

// ==========================================
// NewOperation - 行动写入参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOperation {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub location: Option<String>,
    pub active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub image: Option<ImageRef>,
    pub lines: Vec<NewOperationLine>,
}

impl NewOperation {
    /// 校验表头并把全部明细收敛为 (目标, 数量)
    pub fn validated_lines(&self) -> DomainResult<Vec<(OperationLineTarget, i64)>> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyField {
                field: "name".to_string(),
            });
        }
        self.lines
            .iter()
            .map(|line| line.target().map(|target| (target, line.quantity)))
            .collect()
    }
}

// ==========================================
// 明细行（读模型）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationItemLine {
    pub id: i64,
    pub operation_id: i64,
    pub item: Option<ItemSummary>,
    pub quantity: i64,
}

impl OperationItemLine {
    pub fn line_value(&self) -> f64 {
        self.item
            .as_ref()
            .map(|item| item.value * self.quantity as f64)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationPackageLine {
    pub id: i64,
    pub operation_id: i64,
    pub package: Option<PackageWithItems>,
    pub quantity: i64,
}

impl OperationPackageLine {
    /// 包裹按自身明细递归计价,再乘以行数量
    pub fn line_value(&self) -> f64 {
        self.package
            .as_ref()
            .map(|package| package.total_value() * self.quantity as f64)
            .unwrap_or(0.0)
    }
}

// ==========================================
// OperationWithLines - 行动 + 两类明细
// ==========================================
// 物品明细与包裹明细分开存放,导出时分别打标
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationWithLines {
    pub operation: Operation,
    pub items: Vec<OperationItemLine>,
    pub packages: Vec<OperationPackageLine>,
}

impl OperationWithLines {
    pub fn total_value(&self) -> f64 {
        let items: f64 = self.items.iter().map(OperationItemLine::line_value).sum();
        let packages: f64 = self
            .packages
            .iter()
            .map(OperationPackageLine::line_value)
            .sum();
        items + packages
    }
}
