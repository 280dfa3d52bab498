//! # Receipt Renderer
//!
//! Turns an order and its totals into the customer's receipt.
//!
//! ## Text Layout
//! ```text
//! ===== COMPROVANTE =====
//! Pedido: PED-1760608800000
//! Data: 16/10/2025 10:00:00
//! Cliente: João                    ← only with options.customer_name
//! Pagamento: Dinheiro              ← only when a method is chosen
//! ------------------------------
//! Café x2  ->  R$ 7,00
//! Bolo x1  ->  R$ 6,00
//! ------------------------------
//! TOTAL: R$ 13,00
//! Valor recebido: R$ 15,00         ← cash only
//! Troco: R$ 2,00                   ← cash only, never negative
//! ==============================
//! ```
//!
//! The HTML variant carries the same content as a table for the on-screen
//! receipt. Both are pure functions of `(order, totals, options)`.

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::CurrencyFormat;
use crate::order::{Order, PaymentMethod};
use crate::totals::{change_due, TotalsResult};

/// Date pattern used when none (or an invalid one) is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Fixed text shown instead of a receipt for an order without items.
pub const EMPTY_ORDER_NOTICE: &str = "⚠️ Não há itens no pedido.";

const TITLE: &str = "===== COMPROVANTE =====";
const RULE: &str = "------------------------------";
const FOOTER: &str = "==============================";

// =============================================================================
// Options
// =============================================================================

/// Presentation options for a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptOptions {
    /// Printed as `Cliente: ...` when set. Default: `None` (line omitted).
    pub customer_name: Option<String>,

    /// Currency convention. Default: `R$ 1.234,56`.
    pub currency: CurrencyFormat,

    /// `strftime` pattern for the order date. Default: [`DEFAULT_DATE_FORMAT`].
    pub date_format: String,

    /// Offset from UTC, in minutes, applied to the order date.
    /// Default: `0` (UTC). Brasília is `-180`.
    pub utc_offset_minutes: i32,
}

impl Default for ReceiptOptions {
    fn default() -> Self {
        ReceiptOptions {
            customer_name: None,
            currency: CurrencyFormat::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl ReceiptOptions {
    /// Same options with a customer name; blank names are treated as absent.
    pub fn with_customer(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name.trim();
        self.customer_name = (!name.is_empty()).then(|| name.to_string());
        self
    }
}

/// Returns true when `pattern` is a well-formed `strftime` pattern.
pub fn is_valid_date_format(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

// =============================================================================
// Receipt
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptFormat {
    Text,
    Html,
}

/// A rendered receipt. Identified only by the order it was rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    pub order_id: String,
    pub format: ReceiptFormat,
    pub body: String,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders the plain-text receipt.
///
/// ```rust
/// use cafe_core::{receipt, totals, Catalog, Order, ReceiptOptions};
///
/// let mut catalog = Catalog::new();
/// let cafe = catalog.add_product("Café", "Café", 350).unwrap();
/// let mut order = Order::new();
/// order.add_item(&cafe, 2).unwrap();
///
/// let totals = totals::compute(&order);
/// let receipt = receipt::render(&order, &totals, &ReceiptOptions::default()).unwrap();
/// assert!(receipt.body.contains("Café x2  ->  R$ 7,00"));
/// assert!(receipt.body.contains("TOTAL: R$ 7,00"));
/// ```
///
/// ## Errors
/// [`CoreError::EmptyOrder`] when the order has no lines.
pub fn render(order: &Order, totals: &TotalsResult, options: &ReceiptOptions) -> CoreResult<Receipt> {
    if order.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    let money = |cents: i64| options.currency.format(cents);
    let mut lines = vec![
        TITLE.to_string(),
        format!("Pedido: {}", order.id),
        format!("Data: {}", format_date(order, options)),
    ];

    if let Some(customer) = &options.customer_name {
        lines.push(format!("Cliente: {customer}"));
    }
    if let Some(label) = order.payment_method().label() {
        lines.push(format!("Pagamento: {label}"));
    }

    lines.push(RULE.to_string());
    for row in &totals.lines {
        lines.push(format!(
            "{} x{}  ->  {}",
            row.name,
            row.quantity,
            money(row.line_total_cents)
        ));
    }
    lines.push(RULE.to_string());
    lines.push(format!("TOTAL: {}", money(totals.subtotal_cents)));

    if order.payment_method() == PaymentMethod::Cash {
        let received = order.cash_received_cents();
        let change = change_due(totals.subtotal_cents, received).change_cents();
        lines.push(format!("Valor recebido: {}", money(received)));
        lines.push(format!("Troco: {}", money(change)));
    }

    lines.push(FOOTER.to_string());

    Ok(Receipt {
        order_id: order.id.clone(),
        format: ReceiptFormat::Text,
        body: lines.join("\n"),
    })
}

/// The text receipt, or [`EMPTY_ORDER_NOTICE`] for an empty order.
pub fn render_or_notice(order: &Order, totals: &TotalsResult, options: &ReceiptOptions) -> String {
    match render(order, totals, options) {
        Ok(receipt) => receipt.body,
        Err(_) => EMPTY_ORDER_NOTICE.to_string(),
    }
}

/// Renders the on-screen (HTML) receipt.
///
/// Every piece of user-provided text is escaped.
///
/// ## Errors
/// [`CoreError::EmptyOrder`] when the order has no lines.
pub fn render_html(
    order: &Order,
    totals: &TotalsResult,
    options: &ReceiptOptions,
) -> CoreResult<Receipt> {
    if order.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    let money = |cents: i64| escape_html(&options.currency.format(cents));
    let mut html = String::new();

    html.push_str(&format!(
        "<div class=\"receipt-meta\"><div>Pedido: {}</div><div>{}</div></div>",
        escape_html(&order.id),
        escape_html(&format_date(order, options))
    ));
    if let Some(customer) = &options.customer_name {
        html.push_str(&format!(
            "<div><strong>Cliente:</strong> {}</div>",
            escape_html(customer)
        ));
    }

    html.push_str(
        "<table><thead><tr><th>Produto</th><th>Qt</th><th>Preço</th><th>Subtotal</th></tr></thead><tbody>",
    );
    for row in &totals.lines {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            escape_html(&row.name),
            row.quantity,
            money(row.unit_price_cents),
            money(row.line_total_cents)
        ));
    }
    html.push_str("</tbody></table>");

    html.push_str(&format!(
        "<div class=\"totals\"><div><span>Subtotal</span><strong>{sub}</strong></div>\
         <div><span class=\"total\">TOTAL</span><strong class=\"total\">{sub}</strong></div></div>",
        sub = money(totals.subtotal_cents)
    ));

    if let Some(label) = order.payment_method().label() {
        html.push_str(&format!(
            "<div class=\"payment\"><strong>Pagamento:</strong> {}</div>",
            escape_html(label)
        ));

        if order.payment_method() == PaymentMethod::Cash {
            let received = order.cash_received_cents();
            let change = change_due(totals.subtotal_cents, received).change_cents();
            html.push_str(&format!(
                "<div><strong>Valor recebido:</strong> {}</div><div><strong>Troco:</strong> {}</div>",
                money(received),
                money(change)
            ));
        }
    }

    Ok(Receipt {
        order_id: order.id.clone(),
        format: ReceiptFormat::Html,
        body: html,
    })
}

fn format_date(order: &Order, options: &ReceiptOptions) -> String {
    let offset = options
        .utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix());

    let pattern = if is_valid_date_format(&options.date_format) {
        options.date_format.as_str()
    } else {
        DEFAULT_DATE_FORMAT
    };

    order.created_at.with_timezone(&offset).format(pattern).to_string()
}

/// Escapes `& < > " '` for safe inclusion in markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
