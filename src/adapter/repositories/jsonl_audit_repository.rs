//! JSON Lines Audit Repository Implementation
//!
//! AuditRepositoryのファイル実装（データベースが設定されていない場合に使う）

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::entities::batch::Batch;
use crate::domain::repositories::audit_repository::AuditRepository;

/// JSON Linesファイルベースの監査リポジトリ
///
/// 1バッチにつき1行を追記する
pub struct JsonlAuditRepository {
    path: PathBuf,
}

impl JsonlAuditRepository {
    /// 新しいリポジトリを作成
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_sync(path: &Path, line: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create audit log directory")?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open audit log {}", path.display()))?;
        writeln!(file, "{line}").context("Failed to append to audit log")?;
        Ok(())
    }
}

#[async_trait]
impl AuditRepository for JsonlAuditRepository {
    async fn record(&self, batch: &Batch) -> Result<()> {
        let line = serde_json::to_string(batch).context("Failed to serialize batch")?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::append_sync(&path, &line))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))?
    }
}
