//! # Error Types
//!
//! Domain-specific error types for cafe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cafe-core errors (this file)                                          │
//! │  ├── CoreError        - Domain errors (amount, quantity, index, empty) │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  cafe-terminal errors (in app)                                         │
//! │  └── AppError         - What the counter operator sees                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → prompt again           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error here is local and recoverable. Nothing in the core is
//! subject to transient failure, so nothing is worth retrying: the caller
//! shows the message and asks again.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A price or cash amount is negative, non-finite or unreadable.
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Quantity on add must be at least 1.
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: i64 },

    /// Catalog position out of range on edit/remove.
    ///
    /// `index` is zero-based; `len` is the catalog size at the time.
    #[error("Product not found at position {index} (catalog has {len} products)")]
    NotFound { index: usize, len: usize },

    /// A receipt was requested for an order with zero lines.
    ///
    /// ## User Workflow
    /// ```text
    /// Emit receipt
    ///      │
    ///      ▼
    /// order.lines.is_empty()? ──► EmptyOrder
    ///      │                          │
    ///      ▼                          ▼
    /// Receipt text            "Não há itens no pedido."
    /// ```
    #[error("Order has no items")]
    EmptyOrder,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for an [`CoreError::InvalidAmount`] with a reason.
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        CoreError::InvalidAmount {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation of text fields before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::NotFound { index: 9, len: 3 };
        assert_eq!(
            err.to_string(),
            "Product not found at position 9 (catalog has 3 products)"
        );

        let err = CoreError::InvalidQuantity { quantity: 0 };
        assert_eq!(err.to_string(), "Invalid quantity: 0 (must be at least 1)");

        assert_eq!(CoreError::EmptyOrder.to_string(), "Order has no items");
    }

    #[test]
    fn test_invalid_amount_helper() {
        let err = CoreError::invalid_amount("must not be negative");
        assert_eq!(err.to_string(), "Invalid amount: must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Validation error: name is required");
    }
}
