//! # PriceRow Entity
//!
//! 価格エクスポートの行と、行の順序・列構成を保持する表

use rust_decimal::Decimal;

/// SKU列の見出し
pub const SKU: &str = "SKU";
/// 商品名列の見出し
pub const PRODUCT_NAME: &str = "Product Name";
/// 現在価格列の見出し
pub const CURRENT_PRICE: &str = "CURRENT PRICE";
/// 新価格列の見出し
pub const NEW_PRICE: &str = "NEW PRICE";

/// 入力に必須の列（この順序でエラーメッセージに列挙する）
pub const REQUIRED_COLUMNS: [&str; 4] = [SKU, PRODUCT_NAME, CURRENT_PRICE, NEW_PRICE];

/// デコード直後の表
///
/// 見出し行と各レコードのセルをそのまま保持する。検証前なので列の存在は保証されない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self { headers, records }
    }
}

/// 列の役割
///
/// 見出しの並び順に対応し、各列が行のどのフィールドに割り当てられるかを表す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Sku,
    ProductName,
    CurrentPrice,
    NewPrice,
    /// 必須以外の列（`PriceRow::extra` のインデックス）
    Extra(usize),
}

/// 価格行
///
/// `new_price` が 0 の場合は「変更なし」を意味する
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub sku: String,
    pub product_name: String,
    /// 数値として解釈できなかった場合は `None`
    pub current_price: Option<Decimal>,
    /// 読み込んだときの現在価格セルの文字列（数値でなくても保持する）
    pub raw_current: String,
    pub new_price: Decimal,
    /// 必須以外の列のセル（見出しの出現順）
    pub extra: Vec<String>,
    /// 見出しより右にはみ出したセル
    pub trailing: Vec<String>,
}

impl PriceRow {
    pub fn new(
        sku: impl Into<String>,
        product_name: impl Into<String>,
        current_price: Option<Decimal>,
        new_price: Decimal,
    ) -> Self {
        Self {
            sku: sku.into(),
            product_name: product_name.into(),
            current_price,
            raw_current: current_price.map(|p| p.to_string()).unwrap_or_default(),
            new_price,
            extra: Vec::new(),
            trailing: Vec::new(),
        }
    }

    /// 現在価格を置き換える（セルの文字列も書き換える）
    pub fn set_current_price(&mut self, price: Option<Decimal>) {
        self.current_price = price;
        self.raw_current = price.map(|p| p.to_string()).unwrap_or_default();
    }

    /// 保留中の価格変更があるかどうか
    #[inline]
    pub fn has_pending_change(&self) -> bool {
        self.new_price > Decimal::ZERO
    }
}

/// 価格表（RowSet）
///
/// 行の挿入順を保持する。SKUの一意性は検証しない。
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    headers: Vec<String>,
    columns: Vec<Column>,
    rows: Vec<PriceRow>,
}

impl PriceTable {
    /// 見出しと列構成、行から表を作成
    ///
    /// `headers` と `columns` は同じ長さでなければならない
    pub fn new(headers: Vec<String>, columns: Vec<Column>, rows: Vec<PriceRow>) -> Self {
        debug_assert_eq!(headers.len(), columns.len());
        Self {
            headers,
            columns,
            rows,
        }
    }

    /// 必須4列のみを持つ表を作成
    pub fn with_rows(rows: Vec<PriceRow>) -> Self {
        Self::new(
            REQUIRED_COLUMNS.iter().map(|h| h.to_string()).collect(),
            vec![
                Column::Sku,
                Column::ProductName,
                Column::CurrentPrice,
                Column::NewPrice,
            ],
            rows,
        )
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [PriceRow] {
        &mut self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 現在価格セルを数値の書式に揃える（数値でない値は空欄になる）
    pub fn normalize_current_prices(&mut self) {
        for row in &mut self.rows {
            row.set_current_price(row.current_price);
        }
    }

    /// 行を見出しの順序でセルに並べる
    ///
    /// 価格列は呼び出し側が描画した文字列を使い、それ以外の列は元の値をそのまま使う。
    /// 見出しからはみ出したセルは末尾に残す。
    pub fn record(&self, row: &PriceRow, current_price: &str, new_price: &str) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| match column {
                Column::Sku => row.sku.clone(),
                Column::ProductName => row.product_name.clone(),
                Column::CurrentPrice => current_price.to_string(),
                Column::NewPrice => new_price.to_string(),
                Column::Extra(i) => row.extra.get(*i).cloned().unwrap_or_default(),
            })
            .chain(row.trailing.iter().cloned())
            .collect()
    }
}
