// ==========================================
// 库存资产管理系统 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// ==========================================

use crate::domain::import::{ImportProgress, ImportReport, RawRow};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;
use tokio::sync::mpsc::UnboundedSender;

// ==========================================
// ItemImporter Trait
// ==========================================
// 用途: 物品导入主接口
// 实现者: ItemImporterImpl
#[async_trait]
pub trait ItemImporter: Send + Sync {
    /// 从文件导入物品（按扩展名选择解析器）
    ///
    /// # 参数
    /// - user_id: 当前用户（所有新物品归属该用户）
    /// - file_path: .csv / .xlsx 文件路径
    ///
    /// # 返回
    /// - Ok(ImportReport): 校验、解析、落库的完整汇总
    /// - Err: 文件级错误（不存在、格式不支持、内容损坏）
    ///
    /// # 导入流程
    /// 1. 文件解析
    /// 2. 行校验（不通过的行记录在报告中,不阻断）
    /// 3. 分类树预加载
    /// 4. 分批解析分类 + 逐行落库
    async fn import_file(&self, user_id: i64, file_path: &Path) -> ImportResult<ImportReport>;

    /// 从内存字节导入（上传场景,扩展名由调用方声明）
    async fn import_bytes(&self, user_id: i64, bytes: &[u8], extension: &str) -> ImportResult<ImportReport>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录（HashMap<列名, 值>）
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表（已跳过完全空白的行）
    /// - Err: 文件读取错误、格式错误、缺少表头
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;

    /// 解析内存中的文件内容
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// ProgressReporter Trait
// ==========================================
// 用途: 每完成一个批次回报一次进度
pub trait ProgressReporter: Send + Sync {
    fn report(&self, progress: ImportProgress);
}

/// 仅写日志的进度回报器（CLI 默认）
pub struct LogProgressReporter;

impl ProgressReporter for LogProgressReporter {
    fn report(&self, progress: ImportProgress) {
        tracing::info!(
            completed = progress.completed_batches,
            total = progress.total_batches,
            "导入进度 {:.0}%",
            progress.fraction() * 100.0
        );
    }
}

/// 通道回报器: 接收端已关闭时静默丢弃
impl ProgressReporter for UnboundedSender<ImportProgress> {
    fn report(&self, progress: ImportProgress) {
        let _ = self.send(progress);
    }
}
