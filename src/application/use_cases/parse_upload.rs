//! # Parse Upload Use Case
//!
//! アップロードされた価格ファイルの取り込みユースケース
//!
//! 検証して数値を正規化した表をデータディレクトリに保存し、`parse-` バッチとして記録する。
//! ラベルの成果物は作らない。

use chrono::NaiveDateTime;
use log::{error, info};
use std::sync::Arc;

use crate::application::dto::pipeline_config::PipelineConfig;
use crate::application::dto::run_report::UploadReport;
use crate::application::use_cases::record_batch::RecordBatchUseCase;
use crate::domain::entities::batch::{Batch, BatchStatus, RunStamp, Trigger};
use crate::domain::errors::PipelineError;
use crate::domain::repositories::price_source_repository::PriceSourceRepository;
use crate::domain::services::validation::RowModelValidator;

/// アップロード取り込みユースケース
pub struct ParseUploadUseCase<P: PriceSourceRepository> {
    source_repository: Arc<P>,
    record_batch: Arc<RecordBatchUseCase>,
    config: PipelineConfig,
}

impl<P: PriceSourceRepository> ParseUploadUseCase<P> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `source_repository` - 価格ソースリポジトリ
    /// * `record_batch` - 監査記録ユースケース
    /// * `config` - パイプライン設定（ステージングファイルの保存先）
    pub fn new(
        source_repository: Arc<P>,
        record_batch: Arc<RecordBatchUseCase>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source_repository,
            record_batch,
            config,
        }
    }

    /// アップロードされたファイルを取り込む
    ///
    /// # Arguments
    ///
    /// * `file_name` - アップロード時のファイル名（監査メモに残す）
    /// * `bytes` - ファイルの内容
    /// * `now` - 実行時刻
    ///
    /// # Errors
    ///
    /// CSVとして読めない・必須列がない・保存できない場合にエラーを返す
    pub async fn execute(
        &self,
        file_name: &str,
        bytes: &[u8],
        now: NaiveDateTime,
    ) -> Result<UploadReport, PipelineError> {
        let stamp = RunStamp::new(Trigger::Upload, now);

        let raw = self
            .source_repository
            .load_bytes(bytes)
            .await
            .map_err(|source| PipelineError::Malformed { source })?;
        let mut table = RowModelValidator::validate(raw)?;
        table.normalize_current_prices();

        let staged_path = self.config.staging_path(&stamp.token());
        if let Err(source) = self.source_repository.save(&staged_path, &table).await {
            error!("Error saving file {}: {:#}", staged_path.display(), source);
            return Err(PipelineError::Persistence {
                target: staged_path.display().to_string(),
                source,
            });
        }
        info!("Saved upload {} to {}", file_name, staged_path.display());

        let batch = Batch::new(
            &stamp,
            table.len(),
            None,
            None,
            BatchStatus::Success,
            format!("Parsed {file_name}"),
        );
        let audit = self.record_batch.execute(&batch).await;

        Ok(UploadReport {
            items_processed: table.len(),
            batch,
            staged_path,
            audit,
        })
    }
}
