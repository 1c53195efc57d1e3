//! # Validation Module
//!
//! Field-level input validation for the storefront's forms and query strings.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web frontend                                                 │
//! │  ├── `required` attributes, input types                                │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (serde deserialization)                           │
//! │  └── THIS MODULE: field rules (email, PIN code, phone, card, UPI)      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE order numbers, foreign keys                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use furnish_core::validation::{validate_email, validate_pin_code};
//!
//! assert!(validate_email("email", "john@example.com").is_ok());
//! assert!(validate_pin_code("zip_code", "560001").is_ok());
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_SEARCH_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Requires a non-blank value and returns it trimmed.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Requires a non-blank value of at most `max` characters.
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = validate_required(field, value)?;

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value)
}

/// Normalizes an optional text field: blank becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@`
/// - Non-empty local part
/// - Domain containing a dot that isn't at either end
/// - No whitespace
pub fn validate_email(field: &str, value: &str) -> ValidationResult<String> {
    let value = validate_text(field, value, 254)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    if value.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = value
        .split_once('@')
        .ok_or_else(|| invalid("must contain @"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@example.com"));
    }

    let dot_ok = domain
        .find('.')
        .map(|i| i > 0 && !domain.ends_with('.'))
        .unwrap_or(false);
    if !dot_ok {
        return Err(invalid("domain must look like example.com"));
    }

    Ok(value)
}

/// Validates an Indian PIN code: six digits, not starting with 0.
pub fn validate_pin_code(field: &str, value: &str) -> ValidationResult<String> {
    let value = validate_required(field, value)?;

    let six_digits = value.len() == 6 && value.chars().all(|c| c.is_ascii_digit());
    if !six_digits || value.starts_with('0') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a 6-digit PIN code".to_string(),
        });
    }

    Ok(value)
}

/// Validates a phone number.
///
/// ## Rules
/// - Spaces, dashes, parentheses and a leading `+` are allowed as separators
/// - 10 to 13 digits in total (`9876543210`, `+91 98765 43210`)
pub fn validate_phone(field: &str, value: &str) -> ValidationResult<String> {
    let value = validate_required(field, value)?;

    let allowed = value
        .char_indices()
        .all(|(i, c)| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')') || (c == '+' && i == 0));
    let digits = digit_count(&value);

    if !allowed || !(10..=13).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a phone number with 10 to 13 digits".to_string(),
        });
    }

    Ok(value)
}

// =============================================================================
// Payment Field Validators
// =============================================================================

/// Validates a card number (12 to 19 digits, spaces/dashes allowed).
///
/// Returns the digits only. No issuer check: payment is simulated.
pub fn validate_card_number(field: &str, value: &str) -> ValidationResult<String> {
    let value = validate_required(field, value)?;

    let allowed = value.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();

    if !allowed || !(12..=19).contains(&digits.len()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be 12 to 19 digits".to_string(),
        });
    }

    Ok(digits)
}

/// Validates a card expiry in `MM/YY` form.
pub fn validate_expiry(field: &str, value: &str) -> ValidationResult<String> {
    let value = validate_required(field, value)?;

    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be MM/YY".to_string(),
    };

    let (month, year) = value.split_once('/').ok_or_else(invalid)?;
    let two_digits = |s: &str| s.len() == 2 && s.chars().all(|c| c.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return Err(invalid());
    }

    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    Ok(value)
}

/// Validates a CVV (3 or 4 digits).
pub fn validate_cvv(field: &str, value: &str) -> ValidationResult<()> {
    let value = validate_required(field, value)?;

    if !(3..=4).contains(&value.len()) || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be 3 or 4 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a UPI id (`handle@provider`).
pub fn validate_upi_id(field: &str, value: &str) -> ValidationResult<String> {
    let value = validate_required(field, value)?;

    let valid = match value.split_once('@') {
        Some((handle, provider)) => {
            !handle.is_empty()
                && !provider.is_empty()
                && !provider.contains('@')
                && value.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '@'))
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must look like name@bank".to_string(),
        });
    }

    Ok(value)
}

// =============================================================================
// Query Validators
// =============================================================================

/// Normalizes a catalog search term.
///
/// ## Rules
/// - Surrounding whitespace is trimmed
/// - Blank means "no search" (`None`)
/// - Anything past 100 characters is dropped
pub fn normalize_search_query(query: &str) -> Option<String> {
    let query = query.trim();

    if query.is_empty() {
        return None;
    }

    Some(query.chars().take(MAX_SEARCH_LENGTH).collect())
}

/// Upper bound for a requested line quantity.
///
/// Non-positive values are left alone: the cart treats them as "remove".
pub fn validate_quantity(qty: i64) -> ValidationResult<i64> {
    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(qty)
}

fn digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_trims() {
        assert_eq!(validate_required("city", "  Pune ").unwrap(), "Pune");
        assert!(validate_required("city", "   ").is_err());
    }

    #[test]
    fn test_validate_text_length() {
        assert!(validate_text("subject", "Wobbly leg", 10).is_ok());
        assert!(matches!(
            validate_text("subject", "Wobbly legs", 10),
            Err(ValidationError::TooLong { max: 10, .. })
        ));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "john@example.com").is_ok());
        assert!(validate_email("email", "a.b+c@shop.co.in").is_ok());

        assert!(validate_email("email", "").is_err());
        assert!(validate_email("email", "john").is_err());
        assert!(validate_email("email", "@example.com").is_err());
        assert!(validate_email("email", "john@localhost").is_err());
        assert!(validate_email("email", "john@example.").is_err());
        assert!(validate_email("email", "john@@example.com").is_err());
        assert!(validate_email("email", "jo hn@example.com").is_err());
    }

    #[test]
    fn test_validate_pin_code() {
        assert!(validate_pin_code("zip_code", "560001").is_ok());
        assert!(validate_pin_code("zip_code", "56001").is_err());
        assert!(validate_pin_code("zip_code", "060001").is_err());
        assert!(validate_pin_code("zip_code", "56000A").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("phone", "9876543210").is_ok());
        assert!(validate_phone("phone", "+91 98765 43210").is_ok());
        assert!(validate_phone("phone", "(080) 2345-6789").is_ok());

        assert!(validate_phone("phone", "12345").is_err());
        assert!(validate_phone("phone", "98765x43210").is_err());
        assert!(validate_phone("phone", "91+9876543210").is_err());
    }

    #[test]
    fn test_card_fields() {
        assert_eq!(
            validate_card_number("card_number", "4111 1111 1111 1111").unwrap(),
            "4111111111111111"
        );
        assert!(validate_card_number("card_number", "4111").is_err());
        assert!(validate_card_number("card_number", "4111-abcd-1111-1111").is_err());

        assert!(validate_expiry("expiry_date", "12/27").is_ok());
        assert!(validate_expiry("expiry_date", "13/27").is_err());
        assert!(validate_expiry("expiry_date", "00/27").is_err());
        assert!(validate_expiry("expiry_date", "1227").is_err());

        assert!(validate_cvv("cvv", "123").is_ok());
        assert!(validate_cvv("cvv", "1234").is_ok());
        assert!(validate_cvv("cvv", "12").is_err());
        assert!(validate_cvv("cvv", "12a").is_err());
    }

    #[test]
    fn test_validate_upi_id() {
        assert!(validate_upi_id("upi_id", "john.doe@okbank").is_ok());
        assert!(validate_upi_id("upi_id", "john").is_err());
        assert!(validate_upi_id("upi_id", "@okbank").is_err());
        assert!(validate_upi_id("upi_id", "john@").is_err());
        assert!(validate_upi_id("upi_id", "jo hn@okbank").is_err());
    }

    #[test]
    fn test_normalize_search_query() {
        assert_eq!(normalize_search_query("  Sofa "), Some("Sofa".to_string()));
        assert_eq!(normalize_search_query("   "), None);

        let long = "a".repeat(150);
        assert_eq!(normalize_search_query(&long).unwrap().len(), MAX_SEARCH_LENGTH);
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(-4).is_ok());
        assert!(validate_quantity(1000).is_err());
    }
}
