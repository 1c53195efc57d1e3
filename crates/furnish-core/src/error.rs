//! # Error Types
//!
//! Domain-specific error types for furnish-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  furnish-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  furnish-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Storefront errors (in app)                                            │
//! │  └── ApiError         - What HTTP clients see (JSON + status)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Client                 │
//! │        DbError ─────────────────────► ApiError                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart actions have no error type at all: every action is total.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id isn't in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order number doesn't exist.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Checkout was submitted with nothing in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Order is outside the return/replacement rules.
    ///
    /// ## When This Occurs
    /// - Order hasn't been delivered yet
    /// - Order was placed more than 30 days ago
    #[error("Order {order_number} is not eligible for return or replacement: {reason}")]
    ReturnNotAllowed {
        order_number: String,
        reason: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Each carries the offending field name so forms can highlight it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. email without a domain, 5-digit PIN code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
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
        let err = CoreError::ReturnNotAllowed {
            order_number: "FS123457".to_string(),
            reason: "order has not been delivered".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Order FS123457 is not eligible for return or replacement: order has not been delivered"
        );
        assert_eq!(CoreError::EmptyCart.to_string(), "Cannot check out an empty cart");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");
        assert_eq!(err.field(), "email");

        let err = ValidationError::TooLong {
            field: "description".to_string(),
            max: 2000,
        };
        assert_eq!(err.to_string(), "description must be at most 2000 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "zip_code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
