//! # Pipeline Errors
//!
//! パイプラインのエラー分類
//!
//! - 呼び出し側に返す失敗: [`PipelineError`]
//! - ログに残して握りつぶす失敗: [`AuditWriteError`], [`SyncError`]

use std::path::PathBuf;
use thiserror::Error;

/// 実行を中断する失敗
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 必須列が不足している（変更を加える前に中断する）
    #[error("missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// 入力ファイルが存在しない、または読めない
    #[error("failed to read input {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// 入力をCSVとして解釈できない
    #[error("malformed input: {source}")]
    Malformed {
        #[source]
        source: anyhow::Error,
    },

    /// 入力の書き戻し・成果物・ステージングファイルを書けない
    #[error("failed to write {target}: {source}")]
    Persistence {
        target: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// 利用者の入力が原因のエラーかどうか
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Schema { .. } | PipelineError::Malformed { .. }
        )
    }
}

/// 監査ストアへの書き込み失敗（実行は成功扱い）
#[derive(Debug, Error)]
#[error("audit write failed for {batch_id}: {source}")]
pub struct AuditWriteError {
    pub batch_id: String,
    #[source]
    pub source: anyhow::Error,
}

/// カタログ同期の失敗（実行は成功扱い）
#[derive(Debug, Error)]
#[error("catalog sync failed: {0}")]
pub struct SyncError(#[source] pub anyhow::Error);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_missing_columns() {
        let err = PipelineError::Schema {
            missing: vec!["CURRENT PRICE".to_string(), "NEW PRICE".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "missing required columns: CURRENT PRICE, NEW PRICE"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_persistence_error_is_not_client_error() {
        let err = PipelineError::Persistence {
            target: "report".to_string(),
            source: anyhow::anyhow!("disk full"),
        };

        assert_eq!(err.to_string(), "failed to write report: disk full");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_sync_error_display() {
        let err = SyncError(anyhow::anyhow!("502 Bad Gateway"));
        assert_eq!(err.to_string(), "catalog sync failed: 502 Bad Gateway");
    }
}
