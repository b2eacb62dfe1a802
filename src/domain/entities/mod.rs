//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **PriceRow / PriceTable**: 価格エクスポートの行と表
//! - **Batch**: 1回の実行を表す監査レコード

pub mod batch;
pub mod price_row;
