//! # Order
//!
//! The order being rung up at the counter.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────────┐     ┌───────────┐  │
//! │  │  Empty   │────►│ Building │────►│   Payment    │────►│ Finalized │  │
//! │  │          │     │          │     │   Selected   │     │           │  │
//! │  └──────────┘     └──────────┘     └──────────────┘     └───────────┘  │
//! │                   add_item         set_payment          finalize       │
//! │                   remove_item                                          │
//! │                   set_quantity                                         │
//! │                                                                         │
//! │  clear() ─────────────────────────────────────────────► Empty          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lifecycle is reported by [`Order::status`] but not enforced: a
//! receipt may be rendered before a payment method is chosen (the payment
//! lines are simply absent), and a finalized order still accepts edits.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::catalog::Product;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::receipt::{self, Receipt, ReceiptOptions};
use crate::totals;
use crate::validation::{validate_cash_received, validate_quantity};

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Nothing chosen yet.
    #[default]
    None,
    /// Physical cash; the only method with an amount received and change.
    Cash,
    /// Credit or debit card on the counter terminal.
    Card,
    /// PIX instant transfer.
    Pix,
    /// Meal voucher.
    Voucher,
}

impl PaymentMethod {
    /// Label printed on the receipt, `None` when no method is chosen.
    pub const fn label(&self) -> Option<&'static str> {
        match self {
            PaymentMethod::None => None,
            PaymentMethod::Cash => Some("Dinheiro"),
            PaymentMethod::Card => Some("Cartão"),
            PaymentMethod::Pix => Some("PIX"),
            PaymentMethod::Voucher => Some("Vale"),
        }
    }

    /// Returns true once a method other than `None` is chosen.
    pub const fn is_selected(&self) -> bool {
        !matches!(self, PaymentMethod::None)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("Nenhum"))
    }
}

/// Parses both the English names and the labels operators type
/// (`dinheiro`, `cartão`, `vale`, ...). Case-insensitive.
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" | "nenhum" => Ok(PaymentMethod::None),
            "cash" | "dinheiro" => Ok(PaymentMethod::Cash),
            "card" | "cartao" | "cartão" | "credito" | "crédito" | "debito" | "débito" => {
                Ok(PaymentMethod::Card)
            }
            "pix" => Ok(PaymentMethod::Pix),
            "voucher" | "vale" => Ok(PaymentMethod::Voucher),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: ["dinheiro", "cartão", "pix", "vale"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// One product entry in an order.
///
/// `name` and `unit_price_cents` are frozen when the product is first added,
/// so later catalog edits never change an order in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub product_id: u64,
    /// Product name at time of adding (frozen).
    pub name: String,
    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,
    /// Always `>= 1`.
    pub quantity: i64,
}

impl OrderLine {
    fn from_product(product: &Product, quantity: i64) -> Self {
        OrderLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price().multiply_quantity(self.quantity).cents()
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Where an order is in its lifecycle. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Empty,
    Building,
    PaymentSelected,
    Finalized,
}

// =============================================================================
// Order
// =============================================================================

/// An order: lines plus payment selection.
///
/// ## Invariants
/// - At most one line per product id
/// - Every line has `quantity >= 1`
/// - `cash_received_cents >= 0`, and is 0 unless the method is `Cash`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    /// Order number printed on the receipt (`PED-<millis>` by default).
    pub id: String,

    /// When the checkout started.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    payment_method: PaymentMethod,
    cash_received_cents: i64,
    lines: Vec<OrderLine>,

    #[ts(as = "Option<String>")]
    finalized_at: Option<DateTime<Utc>>,
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

impl Order {
    /// Starts a new order stamped with the current time.
    pub fn new() -> Self {
        let now = Utc::now();
        Self::with_id(format!("PED-{}", now.timestamp_millis()), now)
    }

    /// Starts an order with a caller-chosen id and timestamp.
    pub fn with_id(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Order {
            id: id.into(),
            created_at,
            payment_method: PaymentMethod::None,
            cash_received_cents: 0,
            lines: Vec::new(),
            finalized_at: None,
        }
    }

    /// Adds a product, or increases its quantity if already in the order.
    ///
    /// ```rust
    /// use cafe_core::{Catalog, Order};
    ///
    /// let menu = Catalog::cafe_menu();
    /// let mut order = Order::new();
    /// order.add_item(&menu.list()[0], 1).unwrap();
    /// order.add_item(&menu.list()[0], 1).unwrap();
    ///
    /// assert_eq!(order.lines().len(), 1);
    /// assert_eq!(order.lines()[0].quantity, 2);
    /// ```
    ///
    /// ## Errors
    /// [`CoreError::InvalidQuantity`] if `quantity <= 0`, or if the line
    /// total or subtotal would not fit in an `i64` of cents.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(pos) = self.lines.iter().position(|l| l.product_id == product.id) {
            let line = &self.lines[pos];
            let new_quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or(CoreError::InvalidQuantity { quantity })?;
            self.check_subtotal(product.id, line.unit_price_cents, new_quantity)?;

            self.lines[pos].quantity = new_quantity;
            debug!(order_id = %self.id, product_id = product.id, quantity = new_quantity, "Line quantity increased");
            return Ok(());
        }

        self.check_subtotal(product.id, product.price_cents, quantity)?;
        self.lines.push(OrderLine::from_product(product, quantity));
        debug!(order_id = %self.id, product_id = product.id, quantity, "Line added");
        Ok(())
    }

    /// Removes the line for `product_id`. Absent ids are ignored.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: u64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        let removed = self.lines.len() != before;
        if removed {
            debug!(order_id = %self.id, product_id, "Line removed");
        }
        removed
    }

    /// Sets the quantity of the line for `product_id`.
    ///
    /// ## Clamping Policy
    /// A quantity `<= 0` is stored as 1. Zero never deletes a line: removal
    /// is [`Order::remove_item`].
    ///
    /// Returns whether a line was found.
    ///
    /// ## Errors
    /// [`CoreError::InvalidQuantity`] if the new line total or subtotal
    /// would not fit in an `i64` of cents; the line is left unchanged.
    pub fn set_quantity(&mut self, product_id: u64, quantity: i64) -> CoreResult<bool> {
        let Some(pos) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return Ok(false);
        };

        let quantity = quantity.max(1);
        self.check_subtotal(product_id, self.lines[pos].unit_price_cents, quantity)?;

        self.lines[pos].quantity = quantity;
        debug!(order_id = %self.id, product_id, quantity, "Line quantity set");
        Ok(true)
    }

    /// Removes all lines and resets payment state.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.payment_method = PaymentMethod::None;
        self.cash_received_cents = 0;
        self.finalized_at = None;
        debug!(order_id = %self.id, "Order cleared");
    }

    /// Records the payment selection.
    ///
    /// `cash_received_cents` is kept only for [`PaymentMethod::Cash`]; any
    /// other method resets it to 0.
    ///
    /// ## Errors
    /// [`crate::CoreError::InvalidAmount`] if `cash_received_cents < 0`.
    pub fn set_payment(&mut self, method: PaymentMethod, cash_received_cents: i64) -> CoreResult<()> {
        validate_cash_received(cash_received_cents)?;

        self.payment_method = method;
        self.cash_received_cents = if method == PaymentMethod::Cash {
            cash_received_cents
        } else {
            0
        };

        debug!(order_id = %self.id, method = ?method, cash_received_cents = self.cash_received_cents, "Payment selected");
        Ok(())
    }

    /// Renders the text receipt and marks the order finalized.
    ///
    /// ## Errors
    /// [`crate::CoreError::EmptyOrder`] when there are no lines; the order
    /// is not touched in that case.
    pub fn finalize(&mut self, options: &ReceiptOptions) -> CoreResult<Receipt> {
        let totals = totals::compute(self);
        let receipt = receipt::render(self, &totals, options)?;

        self.finalized_at = Some(Utc::now());
        info!(
            order_id = %self.id,
            total_cents = totals.subtotal_cents,
            lines = totals.item_count(),
            quantity = totals.total_quantity(),
            "Order finalized"
        );
        Ok(receipt)
    }

    /// Fails unless the subtotal, with `product_id` at `quantity`, fits in
    /// an `i64` of cents.
    fn check_subtotal(&self, product_id: u64, unit_price_cents: i64, quantity: i64) -> CoreResult<()> {
        let overflow = CoreError::InvalidQuantity { quantity };
        let mut subtotal = Money::from_cents(unit_price_cents)
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| overflow.clone())?;

        for line in self.lines.iter().filter(|l| l.product_id != product_id) {
            subtotal = line
                .unit_price()
                .checked_multiply_quantity(line.quantity)
                .and_then(|total| subtotal.checked_add(total))
                .ok_or_else(|| overflow.clone())?;
        }
        Ok(())
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn line(&self, product_id: u64) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn cash_received_cents(&self) -> i64 {
        self.cash_received_cents
    }

    pub fn finalized_at(&self) -> Option<DateTime<Utc>> {
        self.finalized_at
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> OrderStatus {
        if self.finalized_at.is_some() {
            OrderStatus::Finalized
        } else if self.lines.is_empty() {
            OrderStatus::Empty
        } else if self.payment_method.is_selected() {
            OrderStatus::PaymentSelected
        } else {
            OrderStatus::Building
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, name: &str, price_cents: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            category: "Café".to_string(),
            price_cents,
        }
    }

    #[test]
    fn test_add_same_product_increases_quantity() {
        let mut order = Order::new();
        let cafe = product(1, "Café", 350);

        order.add_item(&cafe, 1).unwrap();
        order.add_item(&cafe, 1).unwrap();

        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.lines()[0].quantity, 2);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut order = Order::new();
        let cafe = product(1, "Café", 350);

        assert_eq!(
            order.add_item(&cafe, 0),
            Err(CoreError::InvalidQuantity { quantity: 0 })
        );
        assert!(order.add_item(&cafe, -3).is_err());
        assert!(order.is_empty());
    }

    #[test]
    fn test_line_keeps_snapshot_after_catalog_edit() {
        let mut catalog = crate::Catalog::new();
        let cafe = catalog.add_product("Café", "Café", 350).unwrap();

        let mut order = Order::new();
        order.add_item(&cafe, 1).unwrap();
        catalog.edit_product(0, "Café Grande", "Café", 500).unwrap();

        assert_eq!(order.lines()[0].name, "Café");
        assert_eq!(order.lines()[0].unit_price_cents, 350);
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let mut order = Order::new();
        order.add_item(&product(1, "Café", 350), 2).unwrap();
        let before = order.clone();

        assert!(!order.remove_item(99));
        assert_eq!(order, before);
    }

    #[test]
    fn test_remove_item() {
        let mut order = Order::new();
        order.add_item(&product(1, "Café", 350), 2).unwrap();
        order.add_item(&product(2, "Bolo", 600), 1).unwrap();

        assert!(order.remove_item(1));
        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.lines()[0].product_id, 2);
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let mut order = Order::new();
        order.add_item(&product(1, "Café", 350), 3).unwrap();

        assert!(order.set_quantity(1, 0).unwrap());
        assert_eq!(order.line(1).unwrap().quantity, 1);

        assert!(order.set_quantity(1, -7).unwrap());
        assert_eq!(order.line(1).unwrap().quantity, 1);

        assert!(order.set_quantity(1, 5).unwrap());
        assert_eq!(order.line(1).unwrap().quantity, 5);

        assert!(!order.set_quantity(2, 5).unwrap());
    }

    #[test]
    fn test_add_item_rejects_line_total_overflow() {
        let mut order = Order::new();
        let cafe = product(1, "Café Expresso", 450);

        assert_eq!(
            order.add_item(&cafe, 99_999_999_999_999_999),
            Err(CoreError::InvalidQuantity {
                quantity: 99_999_999_999_999_999
            })
        );
        assert!(order.is_empty());
        assert_eq!(totals::compute(&order).subtotal_cents, 0);
    }

    #[test]
    fn test_add_item_rejects_merged_quantity_overflow() {
        let mut order = Order::new();
        let cafe = product(1, "Café Expresso", 1);
        order.add_item(&cafe, i64::MAX - 1).unwrap();

        assert!(matches!(
            order.add_item(&cafe, 5),
            Err(CoreError::InvalidQuantity { .. })
        ));
        assert_eq!(order.line(1).unwrap().quantity, i64::MAX - 1);
    }

    #[test]
    fn test_add_item_rejects_subtotal_overflow() {
        let mut order = Order::new();
        order.add_item(&product(1, "Café", 1), i64::MAX / 2 + 1).unwrap();

        assert!(matches!(
            order.add_item(&product(2, "Bolo", 1), i64::MAX / 2 + 1),
            Err(CoreError::InvalidQuantity { .. })
        ));
        assert_eq!(order.lines().len(), 1);
        assert_eq!(totals::compute(&order).subtotal_cents, i64::MAX / 2 + 1);
    }

    #[test]
    fn test_set_quantity_rejects_overflow() {
        let mut order = Order::new();
        order.add_item(&product(1, "Café", 450), 2).unwrap();

        assert!(matches!(
            order.set_quantity(1, i64::MAX),
            Err(CoreError::InvalidQuantity { .. })
        ));
        assert_eq!(order.line(1).unwrap().quantity, 2);
        assert_eq!(totals::compute(&order).subtotal_cents, 900);
    }

    #[test]
    fn test_set_payment() {
        let mut order = Order::new();

        order.set_payment(PaymentMethod::Cash, 2000).unwrap();
        assert_eq!(order.payment_method(), PaymentMethod::Cash);
        assert_eq!(order.cash_received_cents(), 2000);

        order.set_payment(PaymentMethod::Pix, 2000).unwrap();
        assert_eq!(order.cash_received_cents(), 0);

        assert!(matches!(
            order.set_payment(PaymentMethod::Cash, -1),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert_eq!(order.payment_method(), PaymentMethod::Pix);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut order = Order::new();
        order.add_item(&product(1, "Café", 350), 2).unwrap();
        order.set_payment(PaymentMethod::Cash, 1000).unwrap();
        order.finalize(&ReceiptOptions::default()).unwrap();

        order.clear();

        assert!(order.is_empty());
        assert_eq!(order.payment_method(), PaymentMethod::None);
        assert_eq!(order.cash_received_cents(), 0);
        assert_eq!(order.status(), OrderStatus::Empty);
    }

    #[test]
    fn test_status_transitions() {
        let mut order = Order::new();
        assert_eq!(order.status(), OrderStatus::Empty);

        order.add_item(&product(1, "Café", 350), 1).unwrap();
        assert_eq!(order.status(), OrderStatus::Building);

        order.set_payment(PaymentMethod::Card, 0).unwrap();
        assert_eq!(order.status(), OrderStatus::PaymentSelected);

        order.finalize(&ReceiptOptions::default()).unwrap();
        assert_eq!(order.status(), OrderStatus::Finalized);
        assert!(order.finalized_at().is_some());
    }

    #[test]
    fn test_finalize_empty_order() {
        let mut order = Order::new();
        assert_eq!(
            order.finalize(&ReceiptOptions::default()),
            Err(CoreError::EmptyOrder)
        );
        assert!(order.finalized_at().is_none());
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("dinheiro".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("Cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("Cartão".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!("PIX".parse::<PaymentMethod>().unwrap(), PaymentMethod::Pix);
        assert_eq!("vale".parse::<PaymentMethod>().unwrap(), PaymentMethod::Voucher);
        assert_eq!("".parse::<PaymentMethod>().unwrap(), PaymentMethod::None);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(PaymentMethod::Cash.to_string(), "Dinheiro");
        assert_eq!(PaymentMethod::Card.label(), Some("Cartão"));
        assert_eq!(PaymentMethod::None.label(), None);
    }

    #[test]
    fn test_default_order_id() {
        let order = Order::new();
        assert!(order.id.starts_with("PED-"));
        assert_eq!(
            order.id,
            format!("PED-{}", order.created_at.timestamp_millis())
        );
    }
}
