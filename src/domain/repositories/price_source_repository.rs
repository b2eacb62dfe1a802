//! # Price Source Repository Trait
//!
//! 価格エクスポートの読み込みと書き戻しを抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::price_row::{PriceTable, RawTable};

/// 価格ソースリポジトリ
///
/// 表形式データの読み込みと、反映済みの表の保存を担当するリポジトリ
#[async_trait]
pub trait PriceSourceRepository: Send + Sync {
    /// ファイルから表を読み込む
    ///
    /// # Errors
    ///
    /// ファイルが存在しない、または読めない場合にエラーを返す
    async fn load(&self, path: &Path) -> Result<RawTable>;

    /// アップロードされたバイト列から表を読み込む
    ///
    /// # Errors
    ///
    /// 表形式として解釈できない場合にエラーを返す
    async fn load_bytes(&self, bytes: &[u8]) -> Result<RawTable>;

    /// 表をファイルに保存する
    ///
    /// 価格列は書式なしの数値で書き出す
    ///
    /// # Errors
    ///
    /// ファイルの書き込みに失敗した場合にエラーを返す
    async fn save(&self, path: &Path, table: &PriceTable) -> Result<()>;
}
