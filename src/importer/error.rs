// ==========================================
// 库存资产管理系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分级: 文件级错误终止整个导入；行级问题不走此类型
// ==========================================

use crate::domain::types::TaxonomyLevel;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型（文件级,致命）
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("缺少表头行")]
    MissingHeader,

    #[error("缺少必需列: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    // ===== 依赖错误 =====
    #[error("分类数据加载失败: {0}")]
    TaxonomyLoadError(#[source] RepositoryError),

    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// TaxonomyError - 分类名称解析失败（行级,非致命）
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("分类不存在: {category}")]
    CategoryNotFound { category: String },

    #[error("品类不存在: {family}（分类: {category}）")]
    FamilyNotFound { category: String, family: String },

    #[error("子品类不存在: {sub_family}（分类: {category}, 品类: {family}）")]
    SubFamilyNotFound {
        category: String,
        family: String,
        sub_family: String,
    },

    #[error("{level} 名称重复,无法唯一确定: {name}")]
    Ambiguous { level: TaxonomyLevel, name: String },
}
