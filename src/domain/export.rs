// ==========================================
// 库存资产管理系统 - 导出管道中间结构
// ==========================================
// 流程: ExportSelection → 关联读取 → 平铺行 → 工作簿/CSV
// 生命周期: 仅在一次导出流程内
// ==========================================

use crate::domain::operation::{Operation, OperationWithLines};
use crate::domain::package::{Package, PackageWithItems};
use crate::domain::types::{ExportFormat, ExportRowType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 默认导出文件名前缀
pub const DEFAULT_FILE_PREFIX: &str = "inventory-export";

// ==========================================
// ExportSelection - 不可变的勾选集合
// ==========================================
// 每次修改返回新值,导出函数只接收值本身
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSelection {
    pub operation_ids: BTreeSet<i64>,
    pub package_ids: BTreeSet<i64>,
}

impl ExportSelection {
    pub fn new<O, P>(operation_ids: O, package_ids: P) -> Self
    where
        O: IntoIterator<Item = i64>,
        P: IntoIterator<Item = i64>,
    {
        Self {
            operation_ids: operation_ids.into_iter().collect(),
            package_ids: package_ids.into_iter().collect(),
        }
    }

    pub fn with_operation(&self, id: i64) -> Self {
        let mut next = self.clone();
        next.operation_ids.insert(id);
        next
    }

    pub fn without_operation(&self, id: i64) -> Self {
        let mut next = self.clone();
        next.operation_ids.remove(&id);
        next
    }

    pub fn toggle_operation(&self, id: i64) -> Self {
        if self.operation_ids.contains(&id) {
            self.without_operation(id)
        } else {
            self.with_operation(id)
        }
    }

    pub fn with_package(&self, id: i64) -> Self {
        let mut next = self.clone();
        next.package_ids.insert(id);
        next
    }

    pub fn without_package(&self, id: i64) -> Self {
        let mut next = self.clone();
        next.package_ids.remove(&id);
        next
    }

    pub fn toggle_package(&self, id: i64) -> Self {
        if self.package_ids.contains(&id) {
            self.without_package(id)
        } else {
            self.with_package(id)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operation_ids.is_empty() && self.package_ids.is_empty()
    }
}

// ==========================================
// ExportOptions - 导出选项
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_details: bool,
    /// 生成时间由调用方传入,保证同输入同输出
    pub generated_at: DateTime<Utc>,
    pub file_prefix: String,
}

impl ExportOptions {
    pub fn new(format: ExportFormat, include_details: bool, generated_at: DateTime<Utc>) -> Self {
        Self {
            format,
            include_details,
            generated_at,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }

    /// `<prefix>-<YYYY-MM-DD>.<ext>`
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.file_prefix,
            self.generated_at.format("%Y-%m-%d"),
            self.format.extension()
        )
    }
}

// ==========================================
// 关联读取结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OperationRecord {
    Header(Operation),
    Detailed(OperationWithLines),
}

impl OperationRecord {
    pub fn operation(&self) -> &Operation {
        match self {
            OperationRecord::Header(operation) => operation,
            OperationRecord::Detailed(detailed) => &detailed.operation,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PackageRecord {
    Header(Package),
    Detailed(PackageWithItems),
}

impl PackageRecord {
    pub fn package(&self) -> &Package {
        match self {
            PackageRecord::Header(package) => package,
            PackageRecord::Detailed(detailed) => &detailed.package,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchedSelection {
    pub operations: Vec<OperationRecord>,
    pub packages: Vec<PackageRecord>,
}

// ==========================================
// 平铺行（ExportRow）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationHeaderRow {
    pub operation_id: i64,
    pub name: String,
    pub description: String,
    pub year: Option<i32>,
    pub location: String,
    pub active: bool,
    pub start_date: String,
    pub end_date: String,
    /// 仅在包含明细时有值
    pub item_lines: Option<usize>,
    pub package_lines: Option<usize>,
    pub total_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationLineRow {
    pub row_type: ExportRowType,
    pub operation_id: i64,
    pub operation_name: String,
    pub line_id: i64,
    pub component_id: Option<i64>,
    pub component_name: String,
    pub brand: String,
    pub hs_code: String,
    pub category: String,
    pub family: String,
    pub sub_family: String,
    pub quantity: i64,
    pub unit_value: f64,
    pub line_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageHeaderRow {
    pub package_id: i64,
    pub name: String,
    pub description: String,
    pub year: Option<i32>,
    pub location: String,
    pub active: bool,
    pub item_lines: Option<usize>,
    pub total_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageLineRow {
    pub package_id: i64,
    pub package_name: String,
    pub line_id: i64,
    pub item_id: Option<i64>,
    pub item_name: String,
    pub brand: String,
    pub hs_code: String,
    pub category: String,
    pub family: String,
    pub sub_family: String,
    pub quantity: i64,
    pub unit_value: f64,
    pub line_value: f64,
}

/// 平铺后的四张表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportTables {
    pub operations: Vec<OperationHeaderRow>,
    pub operation_lines: Vec<OperationLineRow>,
    pub packages: Vec<PackageHeaderRow>,
    pub package_lines: Vec<PackageLineRow>,
}

impl ExportTables {
    pub fn operation_item_count(&self) -> usize {
        self.operation_lines
            .iter()
            .filter(|row| row.row_type == ExportRowType::OperationItem)
            .count()
    }

    pub fn operation_package_count(&self) -> usize {
        self.operation_lines
            .iter()
            .filter(|row| row.row_type == ExportRowType::OperationPackage)
            .count()
    }
}

// ==========================================
// ExportArtifact - 可下载产物
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_selection_is_immutable() {
        let empty = ExportSelection::default();
        let one = empty.with_operation(5);
        let toggled = one.toggle_operation(5).toggle_package(9);

        assert!(empty.is_empty());
        assert!(one.operation_ids.contains(&5));
        assert!(toggled.operation_ids.is_empty());
        assert!(toggled.package_ids.contains(&9));
    }

    #[test]
    fn test_file_name_uses_iso_date() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 15, 30, 0).unwrap();
        let options = ExportOptions::new(ExportFormat::Csv, true, at);
        assert_eq!(options.file_name(), "inventory-export-2026-03-09.csv");
    }
}
