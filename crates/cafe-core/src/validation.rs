//! # Validation Module
//!
//! Input checks shared by the catalog and the order.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Front-end (terminal prompt / web form)                        │
//! │  └── Parses text into numbers, re-prompts on garbage                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Names present and bounded                                          │
//! │  ├── Prices and cash non-negative                                       │
//! │  └── Quantities at least 1                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};

/// Longest product name or category accepted.
pub const MAX_NAME_LEN: usize = 120;

/// Validates a product name.
///
/// ```rust
/// use cafe_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Pão de Queijo").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> CoreResult<()> {
    validate_text("name", name, true)
}

/// Validates a product category. Empty is allowed (uncategorized).
pub fn validate_category(category: &str) -> CoreResult<()> {
    validate_text("category", category, false)
}

fn validate_text(field: &str, value: &str, required: bool) -> CoreResult<()> {
    let value = value.trim();

    if required && value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        }
        .into());
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        }
        .into());
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (complimentary items).
pub fn validate_price_cents(cents: i64) -> CoreResult<()> {
    if cents < 0 {
        return Err(CoreError::invalid_amount(format!(
            "price must not be negative (got {cents})"
        )));
    }

    Ok(())
}

/// Validates a cash amount handed over by the customer.
pub fn validate_cash_received(cents: i64) -> CoreResult<()> {
    if cents < 0 {
        return Err(CoreError::invalid_amount(format!(
            "cash received must not be negative (got {cents})"
        )));
    }

    Ok(())
}

/// Validates a quantity being added to an order.
pub fn validate_quantity(quantity: i64) -> CoreResult<()> {
    if quantity <= 0 {
        return Err(CoreError::InvalidQuantity { quantity });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Cappuccino").is_ok());
        assert!(matches!(
            validate_product_name(""),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            validate_product_name(&"A".repeat(MAX_NAME_LEN + 1)),
            Err(CoreError::Validation(ValidationError::TooLong { .. }))
        ));
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("").is_ok());
        assert!(validate_category("Sobremesa").is_ok());
        assert!(validate_category(&"x".repeat(500)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(450).is_ok());
        assert!(matches!(
            validate_price_cents(-1),
            Err(CoreError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert_eq!(
            validate_quantity(0),
            Err(CoreError::InvalidQuantity { quantity: 0 })
        );
        assert_eq!(
            validate_quantity(-2),
            Err(CoreError::InvalidQuantity { quantity: -2 })
        );
    }

    #[test]
    fn test_validate_cash_received() {
        assert!(validate_cash_received(0).is_ok());
        assert!(validate_cash_received(-100).is_err());
    }
}
