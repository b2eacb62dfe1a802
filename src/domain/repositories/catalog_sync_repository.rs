//! # Catalog Sync Repository Trait
//!
//! 外部カタログへの価格表の転送を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// カタログ同期リポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogSyncRepository: Send + Sync {
    /// 行レコードのJSON配列を送信する
    ///
    /// # Errors
    ///
    /// 通信に失敗した場合、または2xx以外の応答の場合にエラーを返す
    async fn push(&self, records: &[serde_json::Value]) -> Result<()>;
}
