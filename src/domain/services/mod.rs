//! # Domain Services
//!
//! 価格更新とラベル生成のビジネスルール
//!
//! - **validation**: 行モデルの検証
//! - **reconciliation**: 新価格の反映とリセット
//! - **report_format**: レポートの整形
//! - **label_layout**: ラベル文書のページ割り付け
//! - **catalog_export**: 外部カタログ向けレコードへの変換

pub mod catalog_export;
pub mod label_layout;
pub mod reconciliation;
pub mod report_format;
pub mod validation;
