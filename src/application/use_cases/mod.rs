//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **GenerateLabelsUseCase**: ローカルファイルからのラベル生成（実行オーケストレータ）
//! - **ParseUploadUseCase**: アップロードされたファイルの取り込み
//! - **RecordBatchUseCase**: バッチの監査記録
//! - **SyncCatalogUseCase**: 外部カタログへの同期

pub mod generate_labels;
pub mod parse_upload;
pub mod record_batch;
pub mod sync_catalog;
