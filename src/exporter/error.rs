// ==========================================
// 库存资产管理系统 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约束: 不存在与无权访问统一为 NotFound,不泄露差异
// ==========================================

use crate::domain::types::EntityKind;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    // ===== 读取错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: EntityKind, id: i64 },

    #[error("关联读取失败 {} 项: {}", .0.len(), join_messages(.0))]
    FetchFailed(Vec<ExportError>),

    #[error("导出选择为空")]
    EmptySelection,

    #[error("数据读取失败: {0}")]
    Repository(#[from] RepositoryError),

    // ===== 生成错误 =====
    #[error("工作簿生成失败: {0}")]
    WorkbookGeneration(String),

    #[error("CSV 生成失败: {0}")]
    CsvGeneration(String),

    // ===== 保存错误 =====
    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),
}

fn join_messages(errors: &[ExportError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// 实现 From<csv::Error>
impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvGeneration(err.to_string())
    }
}

// 实现 From<zip::result::ZipError>
impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::WorkbookGeneration(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
