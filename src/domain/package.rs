// ==========================================
// 库存资产管理系统 - 包裹领域模型
// ==========================================
// 对齐: packages / package_items 表
// 红线: total_value 永远现算,不落库
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::item::{ImageRef, ItemSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Package - 包裹表头
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub location: Option<String>,
    pub active: bool,
    pub image: Option<ImageRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// PackageItem - 包裹明细行
// ==========================================
// 物品被删除后 item 为 None（外键 ON DELETE SET NULL）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageItem {
    pub id: i64,
    pub package_id: i64,
    pub item: Option<ItemSummary>,
    pub quantity: i64,
}

impl PackageItem {
    /// 行价值（物品缺失时为 0）
    pub fn line_value(&self) -> f64 {
        self.item
            .as_ref()
            .map(|item| item.value * self.quantity as f64)
            .unwrap_or(0.0)
    }
}

// ==========================================
// PackageWithItems - 包裹 + 有序明细
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageWithItems {
    pub package: Package,
    pub items: Vec<PackageItem>,
}

impl PackageWithItems {
    /// 包裹总价值 = Σ(item.value × quantity)
    pub fn total_value(&self) -> f64 {
        self.items.iter().map(PackageItem::line_value).sum()
    }
}

// ==========================================
// NewPackage - 包裹写入参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPackage {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub location: Option<String>,
    pub active: bool,
    pub image: Option<ImageRef>,
    pub items: Vec<NewPackageItem>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewPackageItem {
    pub item_id: i64,
    pub quantity: i64,
}

impl NewPackage {
    pub fn check_invariants(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyField {
                field: "name".to_string(),
            });
        }
        if let Some(line) = self.items.iter().find(|line| line.quantity <= 0) {
            return Err(DomainError::NonPositiveQuantity(line.quantity));
        }
        Ok(())
    }
}
