//! # Label Layout Service
//!
//! 価格表を固定ページサイズの複数ページ文書にレイアウトするサービス
//!
//! 座標はPDFと同じく左下原点のポイント単位。描画はAdapter層（`adapter::pdf`）が行い、
//! ここではページ分割と各セルの内容・強調表示だけを決める。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::price_row::{PriceRow, PriceTable};
use crate::domain::services::reconciliation::{PriceChange, Reconciliation};
use crate::domain::services::report_format::{CurrencyFormat, NO_CHANGE_PLACEHOLDER};

/// 見出し行のラベル
pub const HEADER_LABELS: [&str; 4] = ["SKU", "Product Name", "Current Price", "New Price"];

/// ページの寸法と余白（ポイント）
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    /// 各ページ最初の行のベースライン
    pub first_row_y: f32,
    /// 見出し行は最初の行からこの分だけ上に置く
    pub header_offset: f32,
    /// 見出しの下線までの距離
    pub rule_gap: f32,
    pub rule_x: (f32, f32),
    /// SKU, 商品名, 現在価格, 新価格の各列のx座標
    pub column_x: [f32; 4],
    pub row_step: f32,
    /// 行のベースラインはこれより下に置かない
    pub bottom_margin: f32,
    pub header_font_size: f32,
    pub body_font_size: f32,
}

impl Default for LabelLayoutConfig {
    /// A4
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            first_row_y: 800.0,
            header_offset: 30.0,
            rule_gap: 5.0,
            rule_x: (40.0, 550.0),
            column_x: [50.0, 150.0, 400.0, 500.0],
            row_step: 20.0,
            bottom_margin: 50.0,
            header_font_size: 12.0,
            body_font_size: 10.0,
        }
    }
}

impl LabelLayoutConfig {
    /// 1ページに収まる行数
    ///
    /// 行間が0以下、または最初の行が下余白より下にある場合は1行ずつ改ページする
    pub fn rows_per_page(&self) -> usize {
        if self.row_step <= 0.0 || self.first_row_y < self.bottom_margin {
            return 1;
        }
        ((self.first_row_y - self.bottom_margin) / self.row_step).floor() as usize + 1
    }

    /// 見出し行のベースライン
    pub fn header_y(&self) -> f32 {
        self.first_row_y + self.header_offset
    }

    /// 見出し下線のy座標
    pub fn rule_y(&self) -> f32 {
        self.header_y() - self.rule_gap
    }
}

/// 新価格の強調表示を判定する基準
///
/// 反映後は現在価格と適用した新価格が常に一致するため、`PostReconciliation` では
/// 強調表示の分岐に到達しない。変更前の価格と比べる `PreReconciliation` が
/// 本来意図された表示と考えられるが、既定は従来の動作のままにしている。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightBasis {
    /// 反映後の現在価格と比較する（従来の動作）
    #[default]
    PostReconciliation,
    /// 反映前の現在価格と比較する
    PreReconciliation,
}

/// 新価格セル
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceCell {
    /// 変更あり、比較基準と異なる（注意色）
    Attention(String),
    /// 変更あり、比較基準と同じ（通常色）
    Normal(String),
    /// 変更なし
    Placeholder,
}

impl PriceCell {
    pub fn text(&self) -> &str {
        match self {
            PriceCell::Attention(text) | PriceCell::Normal(text) => text,
            PriceCell::Placeholder => NO_CHANGE_PLACEHOLDER,
        }
    }
}

/// 1行分のラベル
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLine {
    pub y: f32,
    pub sku: String,
    pub product_name: String,
    pub current_price: String,
    pub new_price: PriceCell,
}

/// 1ページ
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPage {
    pub header_y: f32,
    pub rule_y: f32,
    pub lines: Vec<LabelLine>,
}

/// レイアウト済み文書
#[derive(Debug, Clone, PartialEq)]
pub struct LabelDocument {
    pub config: LabelLayoutConfig,
    pub pages: Vec<LabelPage>,
}

impl LabelDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }
}

/// ラベルレイアウトサービス
pub struct LabelLayout {
    config: LabelLayoutConfig,
    currency: CurrencyFormat,
    basis: HighlightBasis,
}

impl LabelLayout {
    pub fn new(config: LabelLayoutConfig, currency: CurrencyFormat, basis: HighlightBasis) -> Self {
        Self {
            config,
            currency,
            basis,
        }
    }

    pub fn config(&self) -> &LabelLayoutConfig {
        &self.config
    }

    /// 価格表をページに割り付ける
    ///
    /// 各ページには `rows_per_page` 行ずつ入る。
    /// 行が0件でも見出しだけのページを1枚出力する
    pub fn layout(&self, table: &PriceTable, reconciliation: &Reconciliation) -> LabelDocument {
        let per_page = self.config.rows_per_page();

        let mut pages: Vec<LabelPage> = table
            .rows()
            .chunks(per_page)
            .enumerate()
            .map(|(page_index, rows)| {
                let mut page = self.new_page();
                page.lines = rows
                    .iter()
                    .enumerate()
                    .map(|(slot, row)| {
                        let index = page_index * per_page + slot;
                        let y = self.config.first_row_y - slot as f32 * self.config.row_step;
                        self.line(row, reconciliation.change(index), y)
                    })
                    .collect();
                page
            })
            .collect();
        if pages.is_empty() {
            pages.push(self.new_page());
        }

        LabelDocument {
            config: self.config.clone(),
            pages,
        }
    }

    fn new_page(&self) -> LabelPage {
        LabelPage {
            header_y: self.config.header_y(),
            rule_y: self.config.rule_y(),
            lines: Vec::new(),
        }
    }

    fn line(&self, row: &PriceRow, change: Option<&PriceChange>, y: f32) -> LabelLine {
        LabelLine {
            y,
            sku: row.sku.clone(),
            product_name: row.product_name.clone(),
            current_price: self.currency.format_optional(row.current_price),
            new_price: self.new_price_cell(row, change),
        }
    }

    fn new_price_cell(&self, row: &PriceRow, change: Option<&PriceChange>) -> PriceCell {
        let Some(change) = change else {
            return PriceCell::Placeholder;
        };

        let basis: Option<Decimal> = match self.basis {
            HighlightBasis::PostReconciliation => row.current_price,
            HighlightBasis::PreReconciliation => change.previous,
        };

        let text = self.currency.format(change.applied);
        if basis == Some(change.applied) {
            PriceCell::Normal(text)
        } else {
            PriceCell::Attention(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::price_row::PriceRow;
    use crate::domain::services::reconciliation::PriceReconciler;

    fn price(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn table_of(n: usize) -> PriceTable {
        PriceTable::with_rows(
            (0..n)
                .map(|i| {
                    PriceRow::new(format!("S{i:03}"), "Item", Some(price(100)), Decimal::ZERO)
                })
                .collect(),
        )
    }

    fn layout(basis: HighlightBasis) -> LabelLayout {
        LabelLayout::new(LabelLayoutConfig::default(), CurrencyFormat::default(), basis)
    }

    #[test]
    fn test_default_rows_per_page() {
        assert_eq!(LabelLayoutConfig::default().rows_per_page(), 38);
    }

    #[test]
    fn test_rows_per_page_custom_geometry() {
        let config = LabelLayoutConfig {
            first_row_y: 100.0,
            bottom_margin: 50.0,
            row_step: 10.0,
            ..LabelLayoutConfig::default()
        };
        assert_eq!(config.rows_per_page(), 6);
    }

    #[test]
    fn test_header_and_rule_positions() {
        let config = LabelLayoutConfig::default();
        assert_eq!(config.header_y(), 830.0);
        assert_eq!(config.rule_y(), 825.0);
    }

    #[test]
    fn test_page_count_matches_rows_per_page() {
        let layout = layout(HighlightBasis::default());
        let per_page = layout.config().rows_per_page();

        for n in [1, 37, 38, 39, 76, 77, 200] {
            let table = table_of(n);
            let document = layout.layout(&table, &Reconciliation::unchanged(n));

            assert_eq!(document.page_count(), n.div_ceil(per_page), "rows = {n}");
            assert_eq!(document.line_count(), n);
            for page in &document.pages[..document.page_count() - 1] {
                assert_eq!(page.lines.len(), per_page);
            }
        }
    }

    #[test]
    fn test_page_count_matches_rows_per_page_for_custom_geometry() {
        let geometries = [
            LabelLayoutConfig {
                row_step: 0.0,
                ..LabelLayoutConfig::default()
            },
            LabelLayoutConfig {
                row_step: -5.0,
                ..LabelLayoutConfig::default()
            },
            LabelLayoutConfig {
                first_row_y: 40.0,
                ..LabelLayoutConfig::default()
            },
            LabelLayoutConfig {
                first_row_y: 100.0,
                bottom_margin: 50.0,
                row_step: 15.0,
                ..LabelLayoutConfig::default()
            },
        ];

        for config in geometries {
            let per_page = config.rows_per_page();
            let layout = LabelLayout::new(
                config.clone(),
                CurrencyFormat::default(),
                HighlightBasis::default(),
            );

            let document = layout.layout(&table_of(7), &Reconciliation::unchanged(7));

            assert_eq!(document.page_count(), 7usize.div_ceil(per_page), "{config:?}");
            assert_eq!(document.line_count(), 7);
        }
    }

    #[test]
    fn test_zero_row_step_puts_one_row_per_page() {
        let config = LabelLayoutConfig {
            row_step: 0.0,
            ..LabelLayoutConfig::default()
        };
        let layout = LabelLayout::new(config, CurrencyFormat::default(), HighlightBasis::default());

        let document = layout.layout(&table_of(3), &Reconciliation::unchanged(3));

        assert_eq!(document.page_count(), 3);
        assert!(document.pages.iter().all(|p| p.lines.len() == 1));
        assert_eq!(document.pages[2].lines[0].sku, "S002");
    }

    #[test]
    fn test_empty_table_has_header_page() {
        let document =
            layout(HighlightBasis::default()).layout(&table_of(0), &Reconciliation::default());

        assert_eq!(document.page_count(), 1);
        assert!(document.pages[0].lines.is_empty());
    }

    #[test]
    fn test_rows_step_down_and_restart_on_new_page() {
        let document =
            layout(HighlightBasis::default()).layout(&table_of(40), &Reconciliation::unchanged(40));

        let first = &document.pages[0].lines;
        assert_eq!(first[0].y, 800.0);
        assert_eq!(first[1].y, 780.0);
        assert_eq!(first[37].y, 60.0);
        assert!(first.iter().all(|l| l.y >= 50.0));

        let second = &document.pages[1];
        assert_eq!(second.lines[0].y, 800.0);
        assert_eq!(second.lines[0].sku, "S038");
        assert_eq!(second.header_y, document.pages[0].header_y);
    }

    #[test]
    fn test_post_reconciliation_basis_never_highlights() {
        let mut table = PriceTable::with_rows(vec![
            PriceRow::new("A1", "Widget", Some(price(1000)), price(1200)),
            PriceRow::new("A2", "Gadget", Some(price(500)), Decimal::ZERO),
        ]);
        let reconciliation = PriceReconciler::reconcile(&mut table);

        let document = layout(HighlightBasis::PostReconciliation).layout(&table, &reconciliation);
        let lines = &document.pages[0].lines;

        assert_eq!(lines[0].current_price, "₹12.00");
        assert_eq!(lines[0].new_price, PriceCell::Normal("₹12.00".to_string()));
        assert_eq!(lines[1].new_price, PriceCell::Placeholder);
        assert_eq!(lines[1].new_price.text(), "-");
    }

    #[test]
    fn test_pre_reconciliation_basis_highlights_changed_prices() {
        let mut table = PriceTable::with_rows(vec![
            PriceRow::new("A1", "Widget", Some(price(1000)), price(1200)),
            PriceRow::new("A2", "Gadget", Some(price(700)), price(700)),
            PriceRow::new("A3", "Gizmo", None, price(300)),
        ]);
        let reconciliation = PriceReconciler::reconcile(&mut table);

        let document = layout(HighlightBasis::PreReconciliation).layout(&table, &reconciliation);
        let lines = &document.pages[0].lines;

        assert_eq!(lines[0].new_price, PriceCell::Attention("₹12.00".to_string()));
        assert_eq!(lines[1].new_price, PriceCell::Normal("₹7.00".to_string()));
        assert_eq!(lines[2].new_price, PriceCell::Attention("₹3.00".to_string()));
    }

    #[test]
    fn test_post_reconciliation_attention_branch_on_unreconciled_input() {
        // 反映前の表に変更情報だけを与えると、従来の比較でも強調表示の分岐に入る
        let table = PriceTable::with_rows(vec![PriceRow::new(
            "A1",
            "Widget",
            Some(price(1000)),
            price(1200),
        )]);
        let reconciliation = Reconciliation::new(vec![Some(PriceChange {
            previous: Some(price(1000)),
            applied: price(1200),
        })]);

        let document = layout(HighlightBasis::PostReconciliation).layout(&table, &reconciliation);

        assert_eq!(
            document.pages[0].lines[0].new_price,
            PriceCell::Attention("₹12.00".to_string())
        );
    }

    #[test]
    fn test_highlight_basis_serde() {
        let basis: HighlightBasis = serde_json::from_str("\"pre_reconciliation\"").unwrap();
        assert_eq!(basis, HighlightBasis::PreReconciliation);
        assert_eq!(HighlightBasis::default(), HighlightBasis::PostReconciliation);
    }
}
