//! # Sync Catalog Use Case
//!
//! 外部カタログ同期ユースケース

use log::{info, warn};
use std::sync::Arc;

use crate::application::dto::run_report::SyncStatus;
use crate::domain::entities::price_row::PriceTable;
use crate::domain::errors::SyncError;
use crate::domain::repositories::catalog_sync_repository::CatalogSyncRepository;
use crate::domain::services::catalog_export::CatalogExport;

/// カタログ同期ユースケース
///
/// 接続先が設定されていない場合は何もしない
pub struct SyncCatalogUseCase {
    sync_repository: Option<Arc<dyn CatalogSyncRepository>>,
}

impl SyncCatalogUseCase {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `sync_repository` - 同期リポジトリ（`None` なら同期は無効）
    pub fn new(sync_repository: Option<Arc<dyn CatalogSyncRepository>>) -> Self {
        Self { sync_repository }
    }

    /// 同期が有効かどうか
    pub fn is_enabled(&self) -> bool {
        self.sync_repository.is_some()
    }

    /// 反映済みの価格表全体を送信する
    ///
    /// # Errors
    ///
    /// 送信に失敗した場合に `SyncError` を返す（呼び出し側は実行を失敗にしない）
    pub async fn execute(&self, table: &PriceTable) -> Result<SyncStatus, SyncError> {
        let Some(repository) = &self.sync_repository else {
            return Ok(SyncStatus::Disabled);
        };

        let records = CatalogExport::records(table);
        match repository.push(&records).await {
            Ok(()) => {
                info!("Synced {} records with catalog", records.len());
                Ok(SyncStatus::Synced)
            }
            Err(e) => {
                warn!("Catalog sync failed: {:#}", e);
                Err(SyncError(e))
            }
        }
    }
}
