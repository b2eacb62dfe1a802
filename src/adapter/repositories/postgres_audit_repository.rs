//! PostgreSQL Audit Repository Implementation
//!
//! AuditRepositoryのPostgreSQL実装（`price_update_log` テーブルへの追記）

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::domain::entities::batch::Batch;
use crate::domain::repositories::audit_repository::AuditRepository;

const INSERT_BATCH: &str = "INSERT INTO price_update_log \
     (batch_id, timestamp, items_processed, csv_file, pdf_file, status, notes) \
     VALUES ($1, $2, $3, $4, $5, $6, $7)";

/// PostgreSQL監査リポジトリ
///
/// 接続は最初の書き込み時に確立する。データベースが落ちていても起動はできる。
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// 接続URLからリポジトリを作成
    ///
    /// # Errors
    ///
    /// URLとして解釈できない場合にエラーを返す
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)
            .context("Invalid database URL")?;
        Ok(Self { pool })
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn record(&self, batch: &Batch) -> Result<()> {
        let items = i32::try_from(batch.items_processed()).context("items_processed overflow")?;
        sqlx::query(INSERT_BATCH)
            .bind(batch.batch_id())
            .bind(batch.timestamp())
            .bind(items)
            .bind(batch.report_file())
            .bind(batch.document_file())
            .bind(batch.status().as_str())
            .bind(batch.notes())
            .execute(&self.pool)
            .await
            .context("Failed to insert into price_update_log")?;
        debug!("Inserted {} into price_update_log", batch.batch_id());
        Ok(())
    }
}
