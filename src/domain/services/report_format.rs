//! # Report Formatter
//!
//! 反映済みの価格表を表示用の文字列表に変換するサービス

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::entities::price_row::PriceTable;
use crate::domain::services::reconciliation::Reconciliation;

/// 変更がない行の新価格セル
pub const NO_CHANGE_PLACEHOLDER: &str = "-";

/// 通貨記号付きの金額書式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    symbol: String,
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// 小数点以下2桁の通貨文字列
    ///
    /// ちょうど中間の値は0から遠い方へ丸める（1.005 は 1.01）
    pub fn format(&self, value: Decimal) -> String {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{:.2}", self.symbol, rounded)
    }

    /// 欠損値は空文字列
    pub fn format_optional(&self, value: Option<Decimal>) -> String {
        value.map(|v| self.format(v)).unwrap_or_default()
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("₹")
    }
}

/// 書式済みのレポート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

/// レポート整形サービス
pub struct ReportFormatter {
    currency: CurrencyFormat,
}

impl ReportFormatter {
    pub fn new(currency: CurrencyFormat) -> Self {
        Self { currency }
    }

    /// 価格表をレポートに変換する
    ///
    /// 新価格セルは反映結果に変更がある行だけ通貨文字列になり、それ以外は `-` になる。
    /// 反映後の `new_price` は常に 0 なので、判定には `reconciliation` を使う。
    pub fn format(&self, table: &PriceTable, reconciliation: &Reconciliation) -> ReportTable {
        let records = table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let current = self.currency.format_optional(row.current_price);
                let new = match reconciliation.change(i) {
                    Some(change) => self.currency.format(change.applied),
                    None => NO_CHANGE_PLACEHOLDER.to_string(),
                };
                table.record(row, &current, &new)
            })
            .collect();

        ReportTable {
            headers: table.headers().to_vec(),
            records,
        }
    }
}
