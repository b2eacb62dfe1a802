//! # Batch Entity
//!
//! 1回のパイプライン実行を表す監査レコード

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// バッチIDと成果物ファイル名に使うタイムスタンプ形式
pub const BATCH_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// 実行のトリガー
///
/// バッチIDの接頭辞を決める
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// ローカルファイルからの実行（手動・ファイル監視）
    Local,
    /// アップロードエンドポイントからの実行
    Upload,
}

impl Trigger {
    pub fn prefix(&self) -> &'static str {
        match self {
            Trigger::Local => "batch",
            Trigger::Upload => "parse",
        }
    }
}

/// 実行時刻から導出されるスタンプ
///
/// 1回の実行につき1度だけ作られ、バッチIDと成果物のファイル名で共有される
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStamp {
    trigger: Trigger,
    at: NaiveDateTime,
}

impl RunStamp {
    pub fn new(trigger: Trigger, at: NaiveDateTime) -> Self {
        Self { trigger, at }
    }

    pub fn at(&self) -> NaiveDateTime {
        self.at
    }

    /// `YYYYMMDD-HHMMSS` 形式のトークン
    pub fn token(&self) -> String {
        self.at.format(BATCH_TIMESTAMP_FORMAT).to_string()
    }

    /// `batch-YYYYMMDD-HHMMSS` または `parse-YYYYMMDD-HHMMSS`
    pub fn batch_id(&self) -> String {
        format!("{}-{}", self.trigger.prefix(), self.token())
    }
}

/// バッチの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Success,
    Failure,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Success => "success",
            BatchStatus::Failure => "failure",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// バッチ
///
/// 作成後は変更できない。監査ストアに1度だけ書き込まれる。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch {
    batch_id: String,
    timestamp: NaiveDateTime,
    items_processed: usize,
    report_file: Option<String>,
    document_file: Option<String>,
    status: BatchStatus,
    notes: String,
}

impl Batch {
    /// スタンプからバッチを作成
    ///
    /// # Arguments
    ///
    /// * `stamp` - 実行スタンプ（バッチIDと記録時刻になる）
    /// * `items_processed` - 処理した行数
    /// * `report_file` - CSVレポートのファイル名（ローカル実行のみ）
    /// * `document_file` - PDFのファイル名（ローカル実行のみ）
    /// * `status` - 結果
    /// * `notes` - 自由記述のメモ
    pub fn new(
        stamp: &RunStamp,
        items_processed: usize,
        report_file: Option<String>,
        document_file: Option<String>,
        status: BatchStatus,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            batch_id: stamp.batch_id(),
            timestamp: stamp.at(),
            items_processed,
            report_file,
            document_file,
            status,
            notes: notes.into(),
        }
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn items_processed(&self) -> usize {
        self.items_processed
    }

    pub fn report_file(&self) -> Option<&str> {
        self.report_file.as_deref()
    }

    pub fn document_file(&self) -> Option<&str> {
        self.document_file.as_deref()
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}
