// ==========================================
// 库存资产管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、不变量
// 红线: 不含数据访问逻辑,不含管道逻辑
// ==========================================

pub mod error;
pub mod export;
pub mod import;
pub mod item;
pub mod operation;
pub mod package;
pub mod taxonomy;
pub mod types;
pub mod user;

// 重导出核心类型
pub use error::{DomainError, DomainResult};
pub use export::{
    ExportArtifact, ExportOptions, ExportSelection, ExportTables, FetchedSelection,
    OperationHeaderRow, OperationLineRow, OperationRecord, PackageHeaderRow, PackageLineRow,
    PackageRecord,
};
pub use import::{
    BatchOutcome, FailureStage, FieldError, ImportProgress, ImportReport, ImportRow, RawRow,
    RowDecode, RowFailure, ValidationOutcome,
};
pub use item::{Dimensions, ImageRef, Item, ItemSummary, NewItem};
pub use operation::{
    NewOperation, NewOperationLine, Operation, OperationItemLine, OperationLineTarget,
    OperationPackageLine, OperationWithLines,
};
pub use package::{NewPackage, NewPackageItem, Package, PackageItem, PackageWithItems};
pub use taxonomy::{Category, Family, SubFamily, TaxonomyIds, TaxonomyTree};
pub use types::{EntityKind, ExportFormat, ExportRowType, SourceFormat, TaxonomyLevel};
pub use user::User;
