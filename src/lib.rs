//! # Pricelabel
//!
//! POSの価格エクスポートを取り込み、保留中の価格変更を適用して
//! 価格ラベル（CSVレポートとPDF）を生成するツール
//!
//! このプロジェクトはクリーンアーキテクチャを採用しており、以下の4層で構成されています：
//!
//! - **Domain層**: 価格行・バッチのエンティティと、検証・反映・レイアウトの純粋なロジック
//! - **Application層**: ラベル生成／アップロード取り込みのユースケース
//! - **Adapter層**: 外部システムとの統合（CSV, PDF, PostgreSQL, HTTP, ファイル監視）
//! - **Driver層**: CLI、依存性注入

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
// カバレッジ計測時に外部サービス依存コードを除外するために使用
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（Presentation）
pub mod driver;
