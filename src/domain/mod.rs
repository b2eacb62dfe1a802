//! # Domain Layer
//!
//! このモジュールは価格更新とラベル生成の核心的なルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - 外部システムに依存しない（CSVやPDF、データベースについて何も知らない）
//! - フレームワークに依存しない
//! - 純粋なビジネスロジック
//!
//! ## 構成要素
//!
//! - **entities**: ビジネスエンティティ（PriceRow, PriceTable, Batchなど）
//! - **errors**: パイプラインのエラー分類
//! - **repositories**: Repository trait（インターフェース定義のみ）
//! - **services**: Domain Service（検証・価格反映・整形・レイアウト）

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;
