//! # Price Reconciler
//!
//! 保留中の新価格を現在価格に反映し、新価格をリセットするサービス

use rust_decimal::Decimal;

use crate::domain::entities::price_row::PriceTable;

/// 1行分の価格変更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceChange {
    /// 反映前の現在価格
    pub previous: Option<Decimal>,
    /// 反映した新価格
    pub applied: Decimal,
}

/// 反映結果
///
/// 行と同じ順序で、各行に変更があったかどうかを保持する。
/// 反映後は `new_price` が 0 になるため、「今回変わった行」はこちらで判定する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    changes: Vec<Option<PriceChange>>,
}

impl Reconciliation {
    pub fn new(changes: Vec<Option<PriceChange>>) -> Self {
        Self { changes }
    }

    /// 変更のない反映結果（`len` 行分）
    pub fn unchanged(len: usize) -> Self {
        Self {
            changes: vec![None; len],
        }
    }

    /// 指定行の変更
    pub fn change(&self, index: usize) -> Option<&PriceChange> {
        self.changes.get(index).and_then(Option::as_ref)
    }

    pub fn changes(&self) -> &[Option<PriceChange>] {
        &self.changes
    }

    /// 変更された行数
    pub fn changed_count(&self) -> usize {
        self.changes.iter().filter(|c| c.is_some()).count()
    }

    /// 入力ファイルを書き戻す必要があるかどうか
    pub fn requires_source_rewrite(&self) -> bool {
        self.changes.iter().any(Option::is_some)
    }
}

/// 価格反映サービス
pub struct PriceReconciler;

impl PriceReconciler {
    /// 新価格が 0 より大きい行について、現在価格に反映して新価格を 0 に戻す
    ///
    /// 表は直接書き換えられる
    pub fn reconcile(table: &mut PriceTable) -> Reconciliation {
        let changes = table
            .rows_mut()
            .iter_mut()
            .map(|row| {
                if !row.has_pending_change() {
                    return None;
                }
                let change = PriceChange {
                    previous: row.current_price,
                    applied: row.new_price,
                };
                row.set_current_price(Some(row.new_price));
                row.new_price = Decimal::ZERO;
                Some(change)
            })
            .collect();

        Reconciliation::new(changes)
    }
}
