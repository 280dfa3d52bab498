//! # Catalog
//!
//! The café menu: an ordered list of products.
//!
//! ## Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  id        sequential, starts at 1, never reused                        │
//! │            → what an OrderLine points at                                │
//! │                                                                         │
//! │  position  zero-based index in list()                                   │
//! │            → what the operator picks on screen (shown 1-based)          │
//! │                                                                         │
//! │  Removing product #2 shifts positions, ids stay put.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Editing or removing a product never reaches into existing orders: their
//! lines hold a name/price snapshot taken when the item was added.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_category, validate_price_cents, validate_product_name};

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Sequential identifier, `>= 1`.
    pub id: u64,

    /// Display name shown on the menu and on the receipt.
    pub name: String,

    /// Menu section ("Café", "Salgado", ...).
    pub category: String,

    /// Unit price in cents, `>= 0`.
    pub price_cents: i64,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Ordered collection of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Catalog {
    products: Vec<Product>,
    next_id: u64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog {
            products: Vec::new(),
            next_id: 1,
        }
    }

    /// The menu the counter opens with.
    ///
    /// ```rust
    /// use cafe_core::Catalog;
    ///
    /// let menu = Catalog::cafe_menu();
    /// assert_eq!(menu.len(), 9);
    /// assert_eq!(menu.list()[0].name, "Café Expresso");
    /// assert_eq!(menu.list()[0].price_cents, 450);
    /// ```
    pub fn cafe_menu() -> Self {
        const MENU: &[(&str, &str, i64)] = &[
            ("Café Expresso", "Café", 450),
            ("Cappuccino", "Café", 700),
            ("Mocha", "Café", 850),
            ("Suco de Laranja", "Bebida", 600),
            ("Água Mineral", "Bebida", 300),
            ("Pão de Queijo", "Salgado", 300),
            ("Coxinha", "Salgado", 500),
            ("Bolo de Chocolate", "Sobremesa", 650),
            ("Torta de Limão", "Sobremesa", 700),
        ];

        let mut catalog = Catalog::new();
        for (name, category, price_cents) in MENU {
            catalog.push(name, category, *price_cents);
        }
        catalog
    }

    /// Appends a new product with a fresh sequential id.
    ///
    /// ## Errors
    /// - [`CoreError::InvalidAmount`] if `price_cents < 0`
    /// - [`CoreError::Validation`] if the name is blank or a field is too long
    pub fn add_product(
        &mut self,
        name: &str,
        category: &str,
        price_cents: i64,
    ) -> CoreResult<Product> {
        validate_product_name(name)?;
        validate_category(category)?;
        validate_price_cents(price_cents)?;

        let product = self.push(name, category, price_cents);
        info!(id = product.id, name = %product.name, price_cents, "Product added to catalog");
        Ok(product)
    }

    fn push(&mut self, name: &str, category: &str, price_cents: i64) -> Product {
        let product = Product {
            id: self.next_id,
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            price_cents,
        };
        self.next_id += 1;
        self.products.push(product.clone());
        product
    }

    /// Replaces name, category and price of the product at `index`.
    ///
    /// The id is kept. On any error the catalog is left unchanged.
    ///
    /// ## Errors
    /// - [`CoreError::NotFound`] if `index` is out of range
    /// - the same validation errors as [`Catalog::add_product`]
    pub fn edit_product(
        &mut self,
        index: usize,
        name: &str,
        category: &str,
        price_cents: i64,
    ) -> CoreResult<&Product> {
        let len = self.products.len();
        if index >= len {
            return Err(CoreError::NotFound { index, len });
        }

        validate_product_name(name)?;
        validate_category(category)?;
        validate_price_cents(price_cents)?;

        let product = &mut self.products[index];
        product.name = name.trim().to_string();
        product.category = category.trim().to_string();
        product.price_cents = price_cents;

        info!(id = product.id, position = index + 1, "Product updated");
        Ok(product)
    }

    /// Removes the product at `index` and returns it.
    ///
    /// Orders already holding this product keep their lines.
    pub fn remove_product(&mut self, index: usize) -> CoreResult<Product> {
        let len = self.products.len();
        if index >= len {
            return Err(CoreError::NotFound { index, len });
        }

        let product = self.products.remove(index);
        info!(id = product.id, name = %product.name, "Product removed from catalog");
        Ok(product)
    }

    /// Products in insertion order.
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Looks a product up by position.
    pub fn at(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    /// Looks a product up by id.
    pub fn get(&self, id: u64) -> Option<&Product> {
        let found = self.products.iter().find(|p| p.id == id);
        if found.is_none() {
            debug!(id, "Product id not in catalog");
        }
        found
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(catalog: &Catalog) -> Vec<Product> {
        catalog.list().to_vec()
    }

    #[test]
    fn test_add_product_assigns_sequential_ids() {
        let mut catalog = Catalog::new();
        let a = catalog.add_product("Café", "Café", 350).unwrap();
        let b = catalog.add_product("Bolo", "Sobremesa", 600).unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.list()[1].name, "Bolo");
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut catalog = Catalog::new();
        catalog.add_product("Café", "Café", 350).unwrap();
        catalog.add_product("Bolo", "Sobremesa", 600).unwrap();
        catalog.remove_product(1).unwrap();

        let c = catalog.add_product("Mocha", "Café", 850).unwrap();
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_add_product_rejects_negative_price() {
        let mut catalog = Catalog::new();
        let result = catalog.add_product("Café", "Café", -1);

        assert!(matches!(result, Err(CoreError::InvalidAmount { .. })));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_add_product_rejects_blank_name() {
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.add_product("  ", "Café", 100),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_edit_product() {
        let mut catalog = Catalog::cafe_menu();
        let edited = catalog.edit_product(1, "Cappuccino Grande", "Café", 900).unwrap();

        assert_eq!(edited.id, 2);
        assert_eq!(edited.price_cents, 900);
        assert_eq!(catalog.list()[1].name, "Cappuccino Grande");
    }

    #[test]
    fn test_edit_out_of_range_leaves_catalog_unchanged() {
        let mut catalog = Catalog::cafe_menu();
        let before = snapshot(&catalog);

        let err = catalog.edit_product(9, "X", "Y", 100).unwrap_err();
        assert_eq!(err, CoreError::NotFound { index: 9, len: 9 });
        assert_eq!(snapshot(&catalog), before);
    }

    #[test]
    fn test_edit_with_bad_price_leaves_catalog_unchanged() {
        let mut catalog = Catalog::cafe_menu();
        let before = snapshot(&catalog);

        assert!(catalog.edit_product(0, "Café", "Café", -5).is_err());
        assert_eq!(snapshot(&catalog), before);
    }

    #[test]
    fn test_remove_product() {
        let mut catalog = Catalog::cafe_menu();
        let removed = catalog.remove_product(0).unwrap();

        assert_eq!(removed.name, "Café Expresso");
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.list()[0].name, "Cappuccino");
    }

    #[test]
    fn test_remove_out_of_range_leaves_catalog_unchanged() {
        let mut catalog = Catalog::new();
        catalog.add_product("Café", "Café", 350).unwrap();
        let before = snapshot(&catalog);

        assert_eq!(
            catalog.remove_product(1),
            Err(CoreError::NotFound { index: 1, len: 1 })
        );
        assert_eq!(snapshot(&catalog), before);
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::cafe_menu();
        assert_eq!(catalog.get(3).map(|p| p.name.as_str()), Some("Mocha"));
        assert!(catalog.get(42).is_none());
        assert_eq!(catalog.at(8).map(|p| p.price()), Some(Money::from_cents(700)));
    }
}
