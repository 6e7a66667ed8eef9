// ==========================================
// 库存资产管理系统 - 分批落库
// ==========================================
// 阶段 3: 已校验行 → 分类解析 → 逐行写库
// 约束:
// - 按输入顺序切分批次,批次间、批次内均顺序执行
// - 每行独立原子写入；单行失败只计数,不中断
// - 每批完成后回报进度并让出执行权
// ==========================================

use crate::domain::import::{BatchOutcome, FailureStage, ImportProgress, ImportRow, RowFailure};
use crate::domain::item::NewItem;
use crate::importer::error::TaxonomyError;
use crate::importer::importer_trait::ProgressReporter;
use crate::importer::taxonomy_resolver::TaxonomyResolver;
use crate::repository::import_store::ItemStore;
use tracing::{debug, warn};

/// 批次内的一行: (文件行号, 名称, 解析结果)
type PreparedRow = (usize, String, Result<NewItem, TaxonomyError>);

pub struct BatchPersister {
    batch_size: usize,
}

impl BatchPersister {
    /// batch_size 为 0 时按 1 处理
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 批次总数 = ⌈rows / batch_size⌉
    pub fn batch_count(&self, rows: usize) -> usize {
        rows.div_ceil(self.batch_size)
    }

    /// 执行分批落库
    ///
    /// row_numbers 与 rows 一一对应（文件行号）；缺失时退回输入序号 + 1
    ///
    /// # 返回
    /// - BatchOutcome: succeeded + failed == rows.len()
    pub async fn persist(
        &self,
        store: &dyn ItemStore,
        resolver: &TaxonomyResolver,
        user_id: i64,
        rows: Vec<ImportRow>,
        row_numbers: &[usize],
        reporter: &dyn ProgressReporter,
    ) -> BatchOutcome {
        let total_batches = self.batch_count(rows.len());
        let mut outcome = BatchOutcome::default();

        for (batch_idx, chunk) in rows.chunks(self.batch_size).enumerate() {
            let base = batch_idx * self.batch_size;
            let prepared = prepare_batch(resolver, user_id, base, chunk, row_numbers);

            for (row_number, name, resolved) in prepared {
                match resolved {
                    Err(e) => {
                        warn!(row_number, name = %name, error = %e, "分类解析失败");
                        outcome.failed += 1;
                        outcome.failures.push(RowFailure {
                            row_number,
                            name,
                            stage: FailureStage::Resolution,
                            message: e.to_string(),
                        });
                    }
                    Ok(item) => match store.create_item(&item).await {
                        Ok(id) => {
                            outcome.succeeded += 1;
                            outcome.created_ids.push(id);
                        }
                        Err(e) => {
                            warn!(row_number, name = %name, error = %e, "物品写入失败");
                            outcome.failed += 1;
                            outcome.failures.push(RowFailure {
                                row_number,
                                name,
                                stage: FailureStage::Persistence,
                                message: e.to_string(),
                            });
                        }
                    },
                }
            }

            outcome.batches += 1;
            debug!(
                batch = batch_idx + 1,
                total_batches,
                succeeded = outcome.succeeded,
                failed = outcome.failed,
                "批次完成"
            );
            reporter.report(ImportProgress {
                completed_batches: batch_idx + 1,
                total_batches,
            });
            tokio::task::yield_now().await;
        }

        outcome
    }
}

/// 组批时完成分类解析
fn prepare_batch(
    resolver: &TaxonomyResolver,
    user_id: i64,
    base: usize,
    chunk: &[ImportRow],
    row_numbers: &[usize],
) -> Vec<PreparedRow> {
    chunk
        .iter()
        .enumerate()
        .map(|(offset, row)| {
            let position = base + offset;
            let row_number = row_numbers.get(position).copied().unwrap_or(position + 1);
            let resolved = resolver
                .resolve_row(row)
                .map(|ids| row.clone().into_new_item(user_id, ids));
            (row_number, row.name.clone(), resolved)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::Dimensions;
    use crate::domain::taxonomy::{Category, Family, SubFamily, TaxonomyTree};
    use crate::repository::error::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// 名称以 "bad" 开头的物品写入失败
    struct RecordingStore {
        created: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ItemStore for RecordingStore {
        async fn create_item(&self, item: &NewItem) -> RepositoryResult<i64> {
            if item.name.starts_with("bad") {
                return Err(RepositoryError::CheckConstraintViolation(item.name.clone()));
            }
            let mut created = self.created.lock().unwrap();
            created.push(item.name.clone());
            Ok(created.len() as i64)
        }
    }

    fn resolver() -> TaxonomyResolver {
        TaxonomyResolver::new(TaxonomyTree::build(
            vec![Category { id: 1, name: "Audio".into() }],
            vec![Family { id: 2, category_id: 1, name: "Mics".into() }],
            vec![SubFamily { id: 3, family_id: 2, name: "Wireless".into() }],
        ))
    }

    fn row(name: &str, category: &str) -> ImportRow {
        ImportRow {
            name: name.to_string(),
            description: None,
            brand: "Acme".to_string(),
            value: 1.0,
            insurance_value: 0.0,
            hs_code: "8518".to_string(),
            location: "A1".to_string(),
            dimensions: Dimensions::default(),
            weight: 0.0,
            quantity: 1,
            category_name: category.to_string(),
            family_name: "Mics".to_string(),
            sub_family_name: "Wireless".to_string(),
        }
    }

    #[tokio::test]
    async fn test_batches_cover_every_row() {
        let store = RecordingStore { created: Mutex::new(Vec::new()) };
        let mut rows: Vec<ImportRow> = (0..23).map(|i| row(&format!("item-{}", i), "Audio")).collect();
        rows[4] = row("bad-4", "Audio");
        rows[17] = row("item-17", "Video");
        let (tx, mut rx) = mpsc::unbounded_channel();

        // 文件中第 2 行校验未通过,其后行号整体后移一位
        let row_numbers: Vec<usize> = (1..=24).filter(|n| *n != 2).collect();

        let persister = BatchPersister::new(10);
        let outcome = persister.persist(&store, &resolver(), 7, rows, &row_numbers, &tx).await;

        assert_eq!(outcome.batches, 3);
        assert_eq!(outcome.succeeded, 21);
        assert_eq!(outcome.failed, 2);
        assert_eq!(outcome.succeeded + outcome.failed, 23);
        assert_eq!(outcome.created_ids.len(), 21);

        assert_eq!(outcome.failures[0].row_number, 6);
        assert_eq!(outcome.failures[0].stage, FailureStage::Persistence);
        assert_eq!(outcome.failures[1].row_number, 19);
        assert_eq!(outcome.failures[1].stage, FailureStage::Resolution);

        let mut progress = Vec::new();
        while let Ok(p) = rx.try_recv() {
            progress.push(p.completed_batches);
        }
        assert_eq!(progress, vec![1, 2, 3]);

        // 顺序写入
        let created = store.created.lock().unwrap();
        assert_eq!(created.first().map(String::as_str), Some("item-0"));
        assert_eq!(created.last().map(String::as_str), Some("item-22"));
    }

    #[tokio::test]
    async fn test_empty_input_has_no_batches() {
        let store = RecordingStore { created: Mutex::new(Vec::new()) };
        let (tx, mut rx) = mpsc::unbounded_channel();

        let outcome = BatchPersister::new(10).persist(&store, &resolver(), 1, Vec::new(), &[], &tx).await;

        assert_eq!(outcome, BatchOutcome::default());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_row_number_falls_back_to_input_order() {
        let store = RecordingStore { created: Mutex::new(Vec::new()) };
        let rows = vec![row("item-0", "Audio"), row("item-1", "Video")];
        let (tx, _rx) = mpsc::unbounded_channel();

        let outcome = BatchPersister::new(10).persist(&store, &resolver(), 1, rows, &[], &tx).await;

        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.failures[0].row_number, 2);
    }

    #[test]
    fn test_batch_size_floor_is_one() {
        let persister = BatchPersister::new(0);
        assert_eq!(persister.batch_size(), 1);
        assert_eq!(persister.batch_count(3), 3);
        assert_eq!(BatchPersister::new(10).batch_count(10), 1);
        assert_eq!(BatchPersister::new(10).batch_count(11), 2);
    }
}
