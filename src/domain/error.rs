// ==========================================
// 库存资产管理系统 - 领域不变量错误
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 领域不变量违反
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("名称不能为空: {field}")]
    EmptyField { field: String },

    #[error("金额/尺寸不能为负数: {field}={value}")]
    NegativeAmount { field: String, value: f64 },

    #[error("数量必须为正整数: {0}")]
    NonPositiveQuantity(i64),

    #[error("明细行必须且只能引用物品或包裹之一（item_id={item_id:?}, package_id={package_id:?}）")]
    InvalidLineTarget {
        item_id: Option<i64>,
        package_id: Option<i64>,
    },
}

/// Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
