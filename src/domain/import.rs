// ==========================================
// 库存资产管理系统 - 导入管道中间结构
// ==========================================
// 生命周期: 仅在一次导入流程内,不落库
// 流程: RawRow → RowDecode → ImportRow → NewItem
// ==========================================

use crate::domain::item::{Dimensions, NewItem};
use crate::domain::taxonomy::TaxonomyIds;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 文件解析产物: 表头 → 单元格文本（尚无类型保证）
pub type RawRow = HashMap<String, String>;

// ==========================================
// ImportRow - 已校验的导入行
// ==========================================
// 与 Item 同形,但分类以名称而非 id 表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    pub name: String,
    pub description: Option<String>,
    pub brand: String,
    pub value: f64,
    pub insurance_value: f64,
    pub hs_code: String,
    pub location: String,
    pub dimensions: Dimensions,
    pub weight: f64,
    pub quantity: i64,
    pub category_name: String,
    pub family_name: String,
    pub sub_family_name: String,
}

impl ImportRow {
    /// 分类解析完成后转为写库参数
    pub fn into_new_item(self, user_id: i64, ids: TaxonomyIds) -> NewItem {
        NewItem {
            user_id,
            name: self.name,
            description: self.description,
            brand: self.brand,
            hs_code: self.hs_code,
            location: self.location,
            value: self.value,
            insurance_value: self.insurance_value,
            dimensions: self.dimensions,
            weight: self.weight,
            quantity: self.quantity,
            category_id: ids.category_id,
            family_id: ids.family_id,
            sub_family_id: ids.sub_family_id,
            image: None,
        }
    }
}

// ==========================================
// FieldError - 字段级校验错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,    // 列名（如 "value"）
    pub message: String, // 已本地化的提示
}

// ==========================================
// RowDecode - 解析后立即得到的和类型
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum RowDecode {
    Valid(ImportRow),
    Invalid(Vec<FieldError>),
}

// ==========================================
// ValidationOutcome - 整表校验结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// 通过校验的行（保持原顺序）
    pub valid: Vec<ImportRow>,
    /// 与 valid 一一对应的文件行号（从 1 开始,不含表头）
    pub row_numbers: Vec<usize>,
    /// 行号（从 1 开始,不含表头）→ 错误列表
    pub errors: BTreeMap<usize, Vec<FieldError>>,
}

impl ValidationOutcome {
    pub fn invalid_count(&self) -> usize {
        self.errors.len()
    }
}

// ==========================================
// ImportProgress - 批次进度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProgress {
    pub completed_batches: usize,
    pub total_batches: usize,
}

impl ImportProgress {
    /// 进度比例 [0, 1]；无批次时视为已完成
    pub fn fraction(&self) -> f64 {
        if self.total_batches == 0 {
            1.0
        } else {
            self.completed_batches as f64 / self.total_batches as f64
        }
    }
}

// ==========================================
// 落库失败明细
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureStage {
    Resolution,  // 分类名称解析失败
    Persistence, // 写库失败
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    /// 文件行号（从 1 开始,不含表头）,与校验错误同一编号
    pub row_number: usize,
    pub name: String,
    pub stage: FailureStage,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub batches: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<RowFailure>,
    pub created_ids: Vec<i64>,
}

// ==========================================
// ImportReport - 一次导入的完整汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub import_id: String,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub validation_errors: BTreeMap<usize, Vec<FieldError>>,
    pub batches: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<RowFailure>,
    pub elapsed_ms: i64,
}
