//! # Artifact Repository Trait
//!
//! ラベル成果物（CSVレポートとPDF）の書き出しを抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::domain::services::label_layout::LabelDocument;
use crate::domain::services::report_format::ReportTable;

/// 成果物リポジトリ
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// 書式済みのレポートを書き出す
    async fn write_report(&self, path: &Path, report: &ReportTable) -> Result<()>;

    /// レイアウト済みのラベル文書を書き出す
    async fn write_document(&self, path: &Path, document: &LabelDocument) -> Result<()>;
}
