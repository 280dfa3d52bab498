//! # cafe-core: Pure Business Logic for the Café Counter
//!
//! Catalog, order, totals and receipt logic as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │         Front-end (terminal menu, web counter, ...)            │   │
//! │  │   prompts ──► calls below ──► prints / shows the result        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cafe-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   money ◄── catalog ◄── order ◄── totals ◄── receipt           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • SINGLE WRITER PER INSTANCE        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer cents and the `R$ 1.234,56` currency format
//! - [`catalog`] - The menu: products by position and id
//! - [`order`] - Line items, quantities and payment selection
//! - [`totals`] - Line totals, subtotal and change due
//! - [`receipt`] - Text and HTML receipts
//! - [`validation`] - Input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cafe_core::{receipt, totals, Catalog, Order, PaymentMethod, ReceiptOptions};
//!
//! let menu = Catalog::cafe_menu();
//! let mut order = Order::new();
//! order.add_item(&menu.list()[0], 2).unwrap(); // 2 × Café Expresso
//! order.set_payment(PaymentMethod::Cash, 1000).unwrap();
//!
//! let totals = totals::compute(&order);
//! assert_eq!(totals.subtotal_cents, 900);
//!
//! let text = receipt::render(&order, &totals, &ReceiptOptions::default()).unwrap();
//! assert!(text.body.contains("Troco: R$ 1,00"));
//! ```
//!
//! Catalog and Order are plain owned values. There is no locking; each
//! instance belongs to one session and is mutated by one caller at a time.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod receipt;
pub mod totals;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, Product};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CurrencyFormat, Money};
pub use order::{Order, OrderLine, OrderStatus, PaymentMethod};
pub use receipt::{Receipt, ReceiptFormat, ReceiptOptions};
pub use totals::{ChangeDue, ChangeStatus, TotalsLine, TotalsResult};
