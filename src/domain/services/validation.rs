//! # Row Model Validator
//!
//! 入力表の列構成を検証し、価格列を数値に変換するサービス

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::domain::entities::price_row::{
    Column, PriceRow, PriceTable, RawTable, CURRENT_PRICE, NEW_PRICE, PRODUCT_NAME,
    REQUIRED_COLUMNS, SKU,
};
use crate::domain::errors::PipelineError;

/// 行モデル検証サービス
pub struct RowModelValidator;

impl RowModelValidator {
    /// 生の表を検証して価格表に変換する
    ///
    /// 価格列の値が数値でない場合はエラーにせず「欠損」として扱い、
    /// 欠損した新価格は 0（変更なし）に正規化する
    ///
    /// # Errors
    ///
    /// 必須列が1つでも欠けている場合に `PipelineError::Schema` を返す
    pub fn validate(raw: RawTable) -> Result<PriceTable, PipelineError> {
        let columns = Self::assign_columns(&raw.headers);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !raw.headers.iter().any(|h| h == *required))
            .map(|required| required.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::Schema { missing });
        }

        let rows = raw
            .records
            .into_iter()
            .map(|record| Self::build_row(&columns, record))
            .collect();

        Ok(PriceTable::new(raw.headers, columns, rows))
    }

    /// 見出しに列の役割を割り当てる
    ///
    /// 同じ見出しが重複する場合、最初の列だけが必須列になる
    fn assign_columns(headers: &[String]) -> Vec<Column> {
        let mut seen = [false; 4];
        let mut extra = 0;

        headers
            .iter()
            .map(|header| {
                let slot = match header.as_str() {
                    SKU => Some((0, Column::Sku)),
                    PRODUCT_NAME => Some((1, Column::ProductName)),
                    CURRENT_PRICE => Some((2, Column::CurrentPrice)),
                    NEW_PRICE => Some((3, Column::NewPrice)),
                    _ => None,
                };
                match slot {
                    Some((i, column)) if !seen[i] => {
                        seen[i] = true;
                        column
                    }
                    _ => {
                        extra += 1;
                        Column::Extra(extra - 1)
                    }
                }
            })
            .collect()
    }

    /// 見出しより長いレコードの余ったセルは `trailing` に残す
    fn build_row(columns: &[Column], record: Vec<String>) -> PriceRow {
        let mut row = PriceRow::new(String::new(), String::new(), None, Decimal::ZERO);
        let mut cells = record.into_iter();

        for column in columns {
            // 列が足りないレコードは空セルで補う
            let cell = cells.next().unwrap_or_default();
            match column {
                Column::Sku => row.sku = cell,
                Column::ProductName => row.product_name = cell,
                Column::CurrentPrice => {
                    row.current_price = coerce_price(&cell);
                    row.raw_current = cell;
                }
                Column::NewPrice => row.new_price = coerce_price(&cell).unwrap_or(Decimal::ZERO),
                Column::Extra(_) => row.extra.push(cell),
            }
        }
        row.trailing = cells.collect();

        row
    }
}

/// 価格セルを数値に変換する
///
/// 空・非数値・負数は `None`
pub fn coerce_price(cell: &str) -> Option<Decimal> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    let value = Decimal::from_str(cell)
        .or_else(|_| Decimal::from_scientific(cell))
        .ok()?;

    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }

    Some(value)
}
