// ==========================================
// 库存资产管理系统 - 领域类型定义
// ==========================================
// 职责: 管道共享的枚举类型（格式、层级、行类型鉴别器）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 导出行类型 (Export Row Type)
// ==========================================
// CSV 单表输出依靠此列区分行的含义
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportRowType {
    Metadata,         // 导出元信息
    Operation,        // 行动表头
    OperationItem,    // 行动-物品明细
    OperationPackage, // 行动-包裹明细
    Package,          // 包裹表头
    PackageItem,      // 包裹-物品明细
}

impl ExportRowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportRowType::Metadata => "METADATA",
            ExportRowType::Operation => "OPERATION",
            ExportRowType::OperationItem => "OPERATION_ITEM",
            ExportRowType::OperationPackage => "OPERATION_PACKAGE",
            ExportRowType::Package => "PACKAGE",
            ExportRowType::PackageItem => "PACKAGE_ITEM",
        }
    }
}

impl fmt::Display for ExportRowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 导出格式 (Export Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// 文件扩展名（不含点）
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    /// 下载时使用的 MIME 类型
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv;charset=utf-8;",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "xlsx" => Some(ExportFormat::Xlsx),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

// ==========================================
// 导入源文件格式 (Source Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// 根据声明的扩展名判断格式（大小写不敏感，允许带点）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Some(SourceFormat::Csv),
            "xlsx" => Some(SourceFormat::Xlsx),
            _ => None,
        }
    }
}

// ==========================================
// 分类层级 (Taxonomy Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxonomyLevel {
    Category,  // 大类
    Family,    // 族
    SubFamily, // 子族
}

impl fmt::Display for TaxonomyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxonomyLevel::Category => write!(f, "category"),
            TaxonomyLevel::Family => write!(f, "family"),
            TaxonomyLevel::SubFamily => write!(f, "subFamily"),
        }
    }
}

// ==========================================
// 实体类型（用于错误定位）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Item,
    Package,
    Operation,
    Category,
    Family,
    SubFamily,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Item => "item",
            EntityKind::Package => "package",
            EntityKind::Operation => "operation",
            EntityKind::Category => "category",
            EntityKind::Family => "family",
            EntityKind::SubFamily => "subFamily",
            EntityKind::User => "user",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_row_type_serializes_as_discriminator() {
        let json = serde_json::to_string(&ExportRowType::OperationPackage).unwrap();
        assert_eq!(json, "\"OPERATION_PACKAGE\"");
        assert_eq!(ExportRowType::PackageItem.to_string(), "PACKAGE_ITEM");
    }

    #[test]
    fn test_source_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("CSV"), Some(SourceFormat::Csv));
        assert_eq!(SourceFormat::from_extension(".xlsx"), Some(SourceFormat::Xlsx));
        assert_eq!(SourceFormat::from_extension("xls"), None);
    }

    #[test]
    fn test_export_format_mime() {
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv;charset=utf-8;");
        assert_eq!(ExportFormat::parse(" XLSX "), Some(ExportFormat::Xlsx));
    }
}
