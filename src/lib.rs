// ==========================================
// 库存资产管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 多租户库存的表格导入 / 导出数据管道
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 表格文件 → 物品
pub mod importer;

// 导出层 - 行动/包裹 → 表格文件
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{EntityKind, ExportFormat, ExportRowType, SourceFormat, TaxonomyLevel};

// 领域实体
pub use domain::{
    ExportArtifact, ExportOptions, ExportSelection, ImportReport, Item, NewItem, Operation,
    Package, TaxonomyTree,
};

// 管道
pub use exporter::{InventoryExporter, RowFlattener};
pub use importer::{ItemImporter, ItemImporterImpl, TaxonomyResolver};

// API
pub use api::{ExportApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存资产管理系统";
