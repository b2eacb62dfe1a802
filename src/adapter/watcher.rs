//! File Change Watcher
//!
//! Polls the input file's SHA-256 content hash and reports when it changes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Source of change notifications for the watch loop
#[async_trait]
pub trait ChangeWatcher: Send {
    /// Wait until the watched input has new content
    ///
    /// Cancel by dropping the future (e.g. in `tokio::select!`).
    async fn next_change(&mut self) -> Result<()>;

    /// Accept the current content as seen, so that our own rewrite of the
    /// input does not count as a change
    async fn rebaseline(&mut self) -> Result<()>;

    fn path(&self) -> &Path;
}

/// SHA-256 hex digest of a byte slice
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Hash a file, or `None` if it does not exist
pub async fn compute_file_hash(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read(path).await {
        Ok(content) => Ok(Some(compute_hash(&content))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Polling watcher over a single file
pub struct FileHashWatcher {
    path: PathBuf,
    poll_interval: Duration,
    settle_delay: Duration,
    last_hash: Option<String>,
    started: bool,
}

impl FileHashWatcher {
    pub fn new(path: impl Into<PathBuf>, poll_interval: Duration, settle_delay: Duration) -> Self {
        Self {
            path: path.into(),
            poll_interval,
            settle_delay,
            last_hash: None,
            started: false,
        }
    }

    async fn current_hash(&self) -> Option<String> {
        match compute_file_hash(&self.path).await {
            Ok(hash) => hash,
            Err(e) => {
                warn!("{:#}", e);
                None
            }
        }
    }
}

#[async_trait]
impl ChangeWatcher for FileHashWatcher {
    async fn next_change(&mut self) -> Result<()> {
        loop {
            let current = self.current_hash().await;

            if current.is_some() && current != self.last_hash {
                // Initial run fires without waiting
                if !self.started {
                    self.started = true;
                    self.last_hash = current;
                    return Ok(());
                }

                debug!(
                    "Hash changed for {}, waiting {:?} for writes to settle",
                    self.path.display(),
                    self.settle_delay
                );
                tokio::time::sleep(self.settle_delay).await;
                if let Some(settled) = self.current_hash().await {
                    self.last_hash = Some(settled);
                    return Ok(());
                }
            }

            self.started = true;
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn rebaseline(&mut self) -> Result<()> {
        self.last_hash = compute_file_hash(&self.path).await?;
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
