//! # Generate Labels Use Case
//!
//! ローカルファイルからのラベル生成ユースケース（実行オーケストレータ）
//!
//! 検証 → 価格反映（必要なら入力の書き戻し）→ レポート整形とレイアウト →
//! 成果物の書き出し → 監査記録 → カタログ同期 の順に実行する。
//! 監査と同期の失敗は記録のみで、実行は成功として扱う。

use chrono::NaiveDateTime;
use log::{error, info};
use std::path::Path;
use std::sync::Arc;

use crate::application::dto::pipeline_config::PipelineConfig;
use crate::application::dto::run_report::RunReport;
use crate::application::use_cases::record_batch::RecordBatchUseCase;
use crate::application::use_cases::sync_catalog::SyncCatalogUseCase;
use crate::domain::entities::batch::{Batch, BatchStatus, RunStamp, Trigger};
use crate::domain::errors::PipelineError;
use crate::domain::repositories::artifact_repository::ArtifactRepository;
use crate::domain::repositories::price_source_repository::PriceSourceRepository;
use crate::domain::services::label_layout::LabelLayout;
use crate::domain::services::reconciliation::PriceReconciler;
use crate::domain::services::report_format::ReportFormatter;
use crate::domain::services::validation::RowModelValidator;

/// ラベル生成ユースケース
pub struct GenerateLabelsUseCase<P: PriceSourceRepository, A: ArtifactRepository> {
    source_repository: Arc<P>,
    artifact_repository: Arc<A>,
    record_batch: Arc<RecordBatchUseCase>,
    sync_catalog: Arc<SyncCatalogUseCase>,
    config: PipelineConfig,
}

impl<P: PriceSourceRepository, A: ArtifactRepository> GenerateLabelsUseCase<P, A> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `source_repository` - 価格ソースリポジトリ
    /// * `artifact_repository` - 成果物リポジトリ
    /// * `record_batch` - 監査記録ユースケース
    /// * `sync_catalog` - カタログ同期ユースケース
    /// * `config` - パイプライン設定
    pub fn new(
        source_repository: Arc<P>,
        artifact_repository: Arc<A>,
        record_batch: Arc<RecordBatchUseCase>,
        sync_catalog: Arc<SyncCatalogUseCase>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source_repository,
            artifact_repository,
            record_batch,
            sync_catalog,
            config,
        }
    }

    /// 入力ファイルからラベルを生成する
    ///
    /// # Arguments
    ///
    /// * `input` - POS価格エクスポートのパス
    /// * `now` - 実行時刻（バッチIDと成果物名に使う）
    ///
    /// # Errors
    ///
    /// 入力が読めない・必須列がない・ファイルを書けない場合にエラーを返す
    pub async fn execute(
        &self,
        input: &Path,
        now: NaiveDateTime,
    ) -> Result<RunReport, PipelineError> {
        let stamp = RunStamp::new(Trigger::Local, now);

        let raw = self
            .source_repository
            .load(input)
            .await
            .map_err(|source| PipelineError::Read {
                path: input.to_path_buf(),
                source,
            })?;

        let mut table = RowModelValidator::validate(raw)?;
        let reconciliation = PriceReconciler::reconcile(&mut table);

        let source_rewritten = reconciliation.requires_source_rewrite();
        if source_rewritten {
            if let Err(source) = self.source_repository.save(input, &table).await {
                return Err(self
                    .fail(&stamp, table.len(), input.display().to_string(), source)
                    .await);
            }
            info!(
                "Updated current prices with new values ({} rows)",
                reconciliation.changed_count()
            );
        }

        let report = ReportFormatter::new(self.config.report_currency.clone())
            .format(&table, &reconciliation);
        let document = LabelLayout::new(
            self.config.layout.clone(),
            self.config.document_currency.clone(),
            self.config.highlight_basis,
        )
        .layout(&table, &reconciliation);

        let token = stamp.token();
        let report_path = self.config.report_path(&token);
        let document_path = self.config.document_path(&token);

        if let Err(source) = self
            .artifact_repository
            .write_report(&report_path, &report)
            .await
        {
            return Err(self
                .fail(&stamp, table.len(), report_path.display().to_string(), source)
                .await);
        }
        if let Err(source) = self
            .artifact_repository
            .write_document(&document_path, &document)
            .await
        {
            return Err(self
                .fail(&stamp, table.len(), document_path.display().to_string(), source)
                .await);
        }
        info!(
            "Generated {} and {}",
            report_path.display(),
            document_path.display()
        );

        let batch = Batch::new(
            &stamp,
            table.len(),
            file_name(&report_path),
            file_name(&document_path),
            BatchStatus::Success,
            "Generated labels",
        );
        let audit = self.record_batch.execute(&batch).await;
        let sync = self.sync_catalog.execute(&table).await;

        Ok(RunReport {
            batch,
            changed_rows: reconciliation.changed_count(),
            source_rewritten,
            report_path,
            document_path,
            page_count: document.page_count(),
            audit,
            sync,
        })
    }

    /// 書き込み失敗を記録してエラーに変換する
    ///
    /// 失敗バッチの記録はベストエフォートで、その失敗は無視する
    async fn fail(
        &self,
        stamp: &RunStamp,
        row_count: usize,
        target: String,
        source: anyhow::Error,
    ) -> PipelineError {
        error!("Failed to write {}: {:#}", target, source);

        let batch = Batch::new(
            stamp,
            row_count,
            None,
            None,
            BatchStatus::Failure,
            format!("Failed to write {target}: {source}"),
        );
        let _ = self.record_batch.execute(&batch).await;

        PipelineError::Persistence { target, source }
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::run_report::SyncStatus;
    use crate::domain::entities::price_row::{PriceTable, RawTable};
    use crate::domain::repositories::audit_repository::{AuditRepository, MockAuditRepository};
    use crate::domain::repositories::catalog_sync_repository::MockCatalogSyncRepository;
    use crate::domain::services::label_layout::{HighlightBasis, LabelDocument};
    use crate::domain::services::report_format::ReportTable;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct MockSourceRepository {
        raw: Option<RawTable>,
        fail_save: bool,
        saved: Mutex<Option<PriceTable>>,
    }

    impl MockSourceRepository {
        fn new(raw: RawTable) -> Self {
            Self {
                raw: Some(raw),
                fail_save: false,
                saved: Mutex::new(None),
            }
        }

        fn saved(&self) -> Option<PriceTable> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PriceSourceRepository for MockSourceRepository {
        async fn load(&self, _path: &Path) -> Result<RawTable> {
            self.raw
                .clone()
                .ok_or_else(|| anyhow::anyhow!("No such file or directory"))
        }

        async fn load_bytes(&self, _bytes: &[u8]) -> Result<RawTable> {
            unreachable!("local runs read from a path")
        }

        async fn save(&self, _path: &Path, table: &PriceTable) -> Result<()> {
            if self.fail_save {
                anyhow::bail!("read-only file system");
            }
            *self.saved.lock().unwrap() = Some(table.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockArtifactRepository {
        reports: Mutex<Vec<(PathBuf, ReportTable)>>,
        documents: Mutex<Vec<(PathBuf, usize)>>,
    }

    #[async_trait]
    impl ArtifactRepository for MockArtifactRepository {
        async fn write_report(&self, path: &Path, report: &ReportTable) -> Result<()> {
            self.reports
                .lock()
                .unwrap()
                .push((path.to_path_buf(), report.clone()));
            Ok(())
        }

        async fn write_document(&self, path: &Path, document: &LabelDocument) -> Result<()> {
            self.documents
                .lock()
                .unwrap()
                .push((path.to_path_buf(), document.page_count()));
            Ok(())
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 25)
            .unwrap()
            .and_hms_opt(9, 30, 15)
            .unwrap()
    }

    fn raw(rows: &[[&str; 4]]) -> RawTable {
        RawTable::new(
            ["SKU", "Product Name", "CURRENT PRICE", "NEW PRICE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn accepting_audit() -> Arc<dyn AuditRepository> {
        let mut mock = MockAuditRepository::new();
        mock.expect_record().returning(|_| Ok(()));
        Arc::new(mock)
    }

    fn use_case(
        source: Arc<MockSourceRepository>,
        artifacts: Arc<MockArtifactRepository>,
        audit: Arc<dyn AuditRepository>,
        sync: SyncCatalogUseCase,
    ) -> GenerateLabelsUseCase<MockSourceRepository, MockArtifactRepository> {
        GenerateLabelsUseCase::new(
            source,
            artifacts,
            Arc::new(RecordBatchUseCase::new(audit)),
            Arc::new(sync),
            PipelineConfig::new("/data", "₹", "Rs.", HighlightBasis::default()),
        )
    }

    #[tokio::test]
    async fn test_generate_labels_example() {
        let source = Arc::new(MockSourceRepository::new(raw(&[
            ["A1", "Widget", "10.00", "12.00"],
            ["A2", "Gadget", "5.00", "0"],
        ])));
        let artifacts = Arc::new(MockArtifactRepository::default());
        let use_case = use_case(
            source.clone(),
            artifacts.clone(),
            accepting_audit(),
            SyncCatalogUseCase::new(None),
        );

        let report = use_case.execute(Path::new("/data/pos.csv"), now()).await.unwrap();

        assert_eq!(report.batch.batch_id(), "batch-20241225-093015");
        assert_eq!(report.batch.items_processed(), 2);
        assert_eq!(report.batch.report_file(), Some("price_labels_20241225-093015.csv"));
        assert_eq!(report.batch.document_file(), Some("price_labels_20241225-093015.pdf"));
        assert_eq!(report.changed_rows, 1);
        assert!(report.source_rewritten);
        assert_eq!(report.page_count, 1);
        assert!(report.audit.is_ok());
        assert_eq!(report.sync.unwrap(), SyncStatus::Disabled);

        let saved = source.saved().unwrap();
        assert_eq!(saved.rows()[0].current_price, Some(Decimal::new(1200, 2)));
        assert!(saved.rows().iter().all(|r| r.new_price.is_zero()));

        let reports = artifacts.reports.lock().unwrap();
        assert_eq!(reports[0].0, PathBuf::from("/data/price_labels_20241225-093015.csv"));
        assert_eq!(reports[0].1.records[0][3], "₹12.00");
        assert_eq!(reports[0].1.records[1][3], "-");
    }

    #[tokio::test]
    async fn test_no_changes_leaves_source_untouched() {
        let source = Arc::new(MockSourceRepository::new(raw(&[["A2", "Gadget", "5.00", "0"]])));
        let use_case = use_case(
            source.clone(),
            Arc::new(MockArtifactRepository::default()),
            accepting_audit(),
            SyncCatalogUseCase::new(None),
        );

        let report = use_case.execute(Path::new("/data/pos.csv"), now()).await.unwrap();

        assert!(!report.source_rewritten);
        assert!(source.saved().is_none());
    }

    #[tokio::test]
    async fn test_schema_error_aborts_before_mutation() {
        let mut input = raw(&[["A1", "Widget", "10", "12"]]);
        input.headers.pop();
        let source = Arc::new(MockSourceRepository::new(input));
        let artifacts = Arc::new(MockArtifactRepository::default());
        let mut audit = MockAuditRepository::new();
        audit.expect_record().times(0);
        let use_case = use_case(
            source.clone(),
            artifacts.clone(),
            Arc::new(audit),
            SyncCatalogUseCase::new(None),
        );

        let err = use_case
            .execute(Path::new("/data/pos.csv"), now())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Schema { .. }));
        assert!(source.saved().is_none());
        assert!(artifacts.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_input_is_read_error() {
        let source = Arc::new(MockSourceRepository {
            raw: None,
            fail_save: false,
            saved: Mutex::new(None),
        });
        let use_case = use_case(
            source,
            Arc::new(MockArtifactRepository::default()),
            accepting_audit(),
            SyncCatalogUseCase::new(None),
        );

        let err = use_case
            .execute(Path::new("/data/missing.csv"), now())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Read { .. }));
    }

    #[tokio::test]
    async fn test_source_rewrite_failure_records_failed_batch() {
        let source = Arc::new(MockSourceRepository {
            raw: Some(raw(&[["A1", "Widget", "10", "12"]])),
            fail_save: true,
            saved: Mutex::new(None),
        });
        let artifacts = Arc::new(MockArtifactRepository::default());
        let mut audit = MockAuditRepository::new();
        audit
            .expect_record()
            .withf(|b: &Batch| b.status() == BatchStatus::Failure && b.report_file().is_none())
            .times(1)
            .returning(|_| Ok(()));
        let use_case = use_case(
            source,
            artifacts.clone(),
            Arc::new(audit),
            SyncCatalogUseCase::new(None),
        );

        let err = use_case
            .execute(Path::new("/data/pos.csv"), now())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Persistence { .. }));
        assert!(artifacts.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_audit_and_sync_failures_do_not_fail_run() {
        let source = Arc::new(MockSourceRepository::new(raw(&[["A1", "Widget", "10", "12"]])));
        let mut audit = MockAuditRepository::new();
        audit
            .expect_record()
            .returning(|_| Err(anyhow::anyhow!("database unreachable")));
        let mut sync = MockCatalogSyncRepository::new();
        sync.expect_push()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("503 Service Unavailable")));
        let use_case = use_case(
            source,
            Arc::new(MockArtifactRepository::default()),
            Arc::new(audit),
            SyncCatalogUseCase::new(Some(Arc::new(sync))),
        );

        let report = use_case.execute(Path::new("/data/pos.csv"), now()).await.unwrap();

        assert_eq!(report.batch.status(), BatchStatus::Success);
        assert!(report.audit.is_err());
        assert!(report.sync.is_err());
    }

    #[tokio::test]
    async fn test_sync_receives_reconciled_prices() {
        let source = Arc::new(MockSourceRepository::new(raw(&[["A1", "Widget", "10", "12"]])));
        let mut sync = MockCatalogSyncRepository::new();
        sync.expect_push()
            .withf(|records: &[serde_json::Value]| {
                records[0]["CURRENT PRICE"] == 12.0 && records[0]["NEW PRICE"] == 0.0
            })
            .times(1)
            .returning(|_| Ok(()));
        let use_case = use_case(
            source,
            Arc::new(MockArtifactRepository::default()),
            accepting_audit(),
            SyncCatalogUseCase::new(Some(Arc::new(sync))),
        );

        let report = use_case.execute(Path::new("/data/pos.csv"), now()).await.unwrap();

        assert_eq!(report.sync.unwrap(), SyncStatus::Synced);
    }
}
