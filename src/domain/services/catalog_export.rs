//! # Catalog Export Service
//!
//! 価格表を外部カタログ向けの行レコード（JSON）に変換するサービス

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use crate::domain::entities::price_row::{Column, PriceTable};

/// カタログエクスポートサービス
pub struct CatalogExport;

impl CatalogExport {
    /// 各行を見出しをキーとするJSONオブジェクトに変換する
    ///
    /// 価格は数値（欠損は `null`）、それ以外の列は文字列のまま
    pub fn records(table: &PriceTable) -> Vec<Value> {
        table
            .rows()
            .iter()
            .map(|row| {
                let mut record = Map::new();
                for (header, column) in table.headers().iter().zip(table.columns()) {
                    let value = match column {
                        Column::Sku => Value::String(row.sku.clone()),
                        Column::ProductName => Value::String(row.product_name.clone()),
                        Column::CurrentPrice => price_value(row.current_price),
                        Column::NewPrice => price_value(Some(row.new_price)),
                        Column::Extra(i) => {
                            Value::String(row.extra.get(*i).cloned().unwrap_or_default())
                        }
                    };
                    record.insert(header.clone(), value);
                }
                Value::Object(record)
            })
            .collect()
    }
}

fn price_value(price: Option<Decimal>) -> Value {
    price
        .and_then(|p| p.to_f64())
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
