//! # Audit Repository Trait
//!
//! バッチの監査レコードの永続化を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::batch::Batch;

/// 監査リポジトリ
///
/// 1回の実行につき1行を追記する
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// バッチを記録する
    ///
    /// # Errors
    ///
    /// 監査ストアに到達できない、または挿入に失敗した場合にエラーを返す
    async fn record(&self, batch: &Batch) -> Result<()>;
}
