//! File Artifact Repository Implementation
//!
//! ArtifactRepositoryのファイルシステム実装（CSVレポートとPDF）

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use std::fs;
use std::path::Path;

use crate::adapter::csv_codec::write_records;
use crate::adapter::pdf;
use crate::domain::repositories::artifact_repository::ArtifactRepository;
use crate::domain::services::label_layout::LabelDocument;
use crate::domain::services::report_format::ReportTable;

/// ファイルシステムベースの成果物リポジトリ
#[derive(Debug, Default)]
pub struct FileArtifactRepository;

impl FileArtifactRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    fn write_sync(path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[async_trait]
impl ArtifactRepository for FileArtifactRepository {
    async fn write_report(&self, path: &Path, report: &ReportTable) -> Result<()> {
        let bytes = write_records(&report.headers, &report.records)?;
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::write_sync(&path, &bytes))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;
        info!("Wrote report with {} rows", report.records.len());
        Ok(())
    }

    async fn write_document(&self, path: &Path, document: &LabelDocument) -> Result<()> {
        let document = document.clone();
        let path = path.to_path_buf();
        let pages = document.page_count();
        tokio::task::spawn_blocking(move || {
            let bytes = pdf::render(&document)?;
            Self::write_sync(&path, &bytes)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;
        info!("Wrote label document with {} pages", pages);
        Ok(())
    }
}
