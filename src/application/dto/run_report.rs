//! # Run Report DTO
//!
//! 実行結果（ステージごとの結果を含む）

use std::path::PathBuf;

use crate::domain::entities::batch::Batch;
use crate::domain::errors::{AuditWriteError, SyncError};

/// カタログ同期の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// 送信に成功した
    Synced,
    /// 接続先または認証情報が未設定
    Disabled,
}

/// ローカル実行の結果
#[derive(Debug)]
pub struct RunReport {
    pub batch: Batch,
    /// 価格が反映された行数
    pub changed_rows: usize,
    /// 入力ファイルを書き戻したかどうか
    pub source_rewritten: bool,
    pub report_path: PathBuf,
    pub document_path: PathBuf,
    pub page_count: usize,
    pub audit: Result<(), AuditWriteError>,
    pub sync: Result<SyncStatus, SyncError>,
}

/// アップロード取り込みの結果
#[derive(Debug)]
pub struct UploadReport {
    pub batch: Batch,
    pub items_processed: usize,
    pub staged_path: PathBuf,
    pub audit: Result<(), AuditWriteError>,
}
