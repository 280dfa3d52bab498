//! # Totals Calculator
//!
//! Derives line totals, the subtotal and cash change from an order.
//! Nothing here is stored; totals are recomputed from the order on demand.
//!
//! ```text
//! Café      350 × 2  =  700
//! Bolo      600 × 1  =  600
//!                      ─────
//! subtotal            1300   (no tax or discount stage: total == subtotal)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::order::{Order, OrderLine};

/// A line with its computed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TotalsLine {
    pub product_id: u64,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// `unit_price_cents × quantity`.
    pub line_total_cents: i64,
}

impl From<&OrderLine> for TotalsLine {
    fn from(line: &OrderLine) -> Self {
        TotalsLine {
            product_id: line.product_id,
            name: line.name.clone(),
            unit_price_cents: line.unit_price_cents,
            quantity: line.quantity,
            line_total_cents: line.line_total_cents(),
        }
    }
}

/// Totals for one order snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TotalsResult {
    pub lines: Vec<TotalsLine>,
    pub subtotal_cents: i64,
}

impl TotalsResult {
    /// Amount due. Same as the subtotal.
    pub fn total_cents(&self) -> i64 {
        self.subtotal_cents
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Computes per-line totals and the subtotal. Does not touch the order.
///
/// ```rust
/// use cafe_core::{totals, Catalog, Order};
///
/// let mut catalog = Catalog::new();
/// let cafe = catalog.add_product("Café", "Café", 350).unwrap();
/// let bolo = catalog.add_product("Bolo", "Sobremesa", 600).unwrap();
///
/// let mut order = Order::new();
/// order.add_item(&cafe, 2).unwrap();
/// order.add_item(&bolo, 1).unwrap();
///
/// assert_eq!(totals::compute(&order).subtotal_cents, 1300);
/// ```
pub fn compute(order: &Order) -> TotalsResult {
    let lines: Vec<TotalsLine> = order.lines().iter().map(TotalsLine::from).collect();
    let subtotal_cents = lines
        .iter()
        .map(|l| Money::from_cents(l.line_total_cents))
        .sum::<Money>()
        .cents();

    TotalsResult {
        lines,
        subtotal_cents,
    }
}

// =============================================================================
// Change Due
// =============================================================================

/// Outcome of comparing cash received against the amount due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    /// Cash does not cover the total; `amount_cents` is the shortfall.
    Insufficient,
    /// Cash equals the total.
    Exact,
    /// Cash exceeds the total; `amount_cents` is the change to hand back.
    Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChangeDue {
    pub status: ChangeStatus,
    /// Always non-negative.
    pub amount_cents: i64,
}

impl ChangeDue {
    /// Change to hand back, 0 when cash is short.
    pub fn change_cents(&self) -> i64 {
        match self.status {
            ChangeStatus::Change => self.amount_cents,
            ChangeStatus::Exact | ChangeStatus::Insufficient => 0,
        }
    }
}

/// Compares cash received against the subtotal.
///
/// ```rust
/// use cafe_core::totals::{change_due, ChangeStatus};
///
/// let due = change_due(1300, 1000);
/// assert_eq!(due.status, ChangeStatus::Insufficient);
/// assert_eq!(due.amount_cents, 300);
/// ```
pub fn change_due(subtotal_cents: i64, cash_received_cents: i64) -> ChangeDue {
    let diff = cash_received_cents - subtotal_cents;

    let status = match diff {
        d if d < 0 => ChangeStatus::Insufficient,
        0 => ChangeStatus::Exact,
        _ => ChangeStatus::Change,
    };

    ChangeDue {
        status,
        amount_cents: diff.abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn cafe_and_bolo() -> Order {
        let mut catalog = Catalog::new();
        let cafe = catalog.add_product("Café", "Café", 350).unwrap();
        let bolo = catalog.add_product("Bolo", "Sobremesa", 600).unwrap();

        let mut order = Order::new();
        order.add_item(&cafe, 2).unwrap();
        order.add_item(&bolo, 1).unwrap();
        order
    }

    #[test]
    fn test_compute_subtotal() {
        let order = cafe_and_bolo();
        let totals = compute(&order);

        assert_eq!(totals.subtotal_cents, 1300);
        assert_eq!(totals.total_cents(), 1300);
        assert_eq!(totals.lines[0].line_total_cents, 700);
        assert_eq!(totals.lines[1].line_total_cents, 600);
        assert_eq!(totals.item_count(), 2);
        assert_eq!(totals.total_quantity(), 3);
    }

    #[test]
    fn test_compute_does_not_mutate_order() {
        let order = cafe_and_bolo();
        let before = order.clone();
        let _ = compute(&order);
        assert_eq!(order, before);
    }

    #[test]
    fn test_subtotal_is_exact_sum_of_lines() {
        let mut catalog = Catalog::new();
        let mut order = Order::new();
        // Prices that drift in floating point: 0.1 + 0.2 style
        for (i, price) in [10, 20, 30, 1, 999, 333].into_iter().enumerate() {
            let p = catalog.add_product(&format!("Item {i}"), "Teste", price).unwrap();
            order.add_item(&p, i as i64 + 1).unwrap();
        }

        let totals = compute(&order);
        let expected: i64 = order
            .lines()
            .iter()
            .map(|l| l.unit_price_cents * l.quantity)
            .sum();
        assert_eq!(totals.subtotal_cents, expected);
    }

    #[test]
    fn test_empty_order_totals() {
        let totals = compute(&Order::new());
        assert!(totals.lines.is_empty());
        assert_eq!(totals.subtotal_cents, 0);
    }

    #[test]
    fn test_change_due() {
        assert_eq!(
            change_due(1300, 1300),
            ChangeDue { status: ChangeStatus::Exact, amount_cents: 0 }
        );
        assert_eq!(
            change_due(1300, 1000),
            ChangeDue { status: ChangeStatus::Insufficient, amount_cents: 300 }
        );
        assert_eq!(
            change_due(1300, 1500),
            ChangeDue { status: ChangeStatus::Change, amount_cents: 200 }
        );
    }

    #[test]
    fn test_change_cents_never_negative() {
        assert_eq!(change_due(1300, 1000).change_cents(), 0);
        assert_eq!(change_due(1300, 2000).change_cents(), 700);
    }
}
