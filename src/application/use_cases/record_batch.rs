//! # Record Batch Use Case
//!
//! バッチ監査記録ユースケース

use log::{info, warn};
use std::sync::Arc;

use crate::domain::entities::batch::Batch;
use crate::domain::errors::AuditWriteError;
use crate::domain::repositories::audit_repository::AuditRepository;

/// バッチ監査記録ユースケース
///
/// 1回の実行につき1行を監査ストアに書き込む。失敗しても成果物は巻き戻さない。
pub struct RecordBatchUseCase {
    audit_repository: Arc<dyn AuditRepository>,
}

impl RecordBatchUseCase {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `audit_repository` - 監査リポジトリ
    pub fn new(audit_repository: Arc<dyn AuditRepository>) -> Self {
        Self { audit_repository }
    }

    /// バッチを記録する
    ///
    /// # Errors
    ///
    /// 書き込みに失敗した場合に `AuditWriteError` を返す（呼び出し側は実行を失敗にしない）
    pub async fn execute(&self, batch: &Batch) -> Result<(), AuditWriteError> {
        match self.audit_repository.record(batch).await {
            Ok(()) => {
                info!("Recorded batch {} ({})", batch.batch_id(), batch.status());
                Ok(())
            }
            Err(source) => {
                warn!("Failed to record batch {}: {:#}", batch.batch_id(), source);
                Err(AuditWriteError {
                    batch_id: batch.batch_id().to_string(),
                    source,
                })
            }
        }
    }
}
