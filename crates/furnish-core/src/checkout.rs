//! # Checkout
//!
//! Validates the checkout form and turns a cart into an order draft.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CheckoutForm (contact + address + payment choice)                      │
//! │       │                                                                 │
//! │       ▼  CheckoutForm::validate                                         │
//! │  ValidatedCheckout ──────────┐                                          │
//! │                              ▼                                          │
//! │  CartState ──► OrderDraft::new(checkout, cart, policy, now)             │
//! │                   │  • rejects an empty cart                            │
//! │                   │  • quotes subtotal with the shared PricingPolicy    │
//! │                   │  • snapshots line items                             │
//! │                   ▼                                                     │
//! │            furnish-db persists it ──► storefront dispatches CLEAR_CART  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payment is never charged. Card and UPI fields are checked for shape only
//! and never stored. The order keeps the method; the masked reference is
//! echoed once in the confirmation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{CartItem, CartState};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::pricing::{PriceBreakdown, PricingPolicy};
use crate::types::PaymentMethod;
use crate::validation::{
    validate_card_number, validate_cvv, validate_email, validate_expiry, validate_phone,
    validate_pin_code, validate_text, validate_upi_id, ValidationResult,
};
use crate::{DELIVERY_DAYS, ORDER_NUMBER_PREFIX};

// =============================================================================
// Form
// =============================================================================

/// The checkout form as submitted.
///
/// Missing fields deserialize as empty so validation can name them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub payment_method: Option<PaymentMethod>,
    pub card_number: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,
    pub name_on_card: Option<String>,
    pub upi_id: Option<String>,
}

/// Contact, address and payment choice that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedCheckout {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    /// "street, city, state PIN"
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
    /// `**** 1111` for cards, the UPI id for UPI, `None` for COD.
    pub payment_reference: Option<String>,
}

impl CheckoutForm {
    /// Checks every field and returns the first problem found.
    ///
    /// ## Rules
    /// - email, names, address, city, state, PIN code, phone: required
    /// - `Card`: card number, expiry (MM/YY), CVV and name on card
    /// - `UPI`: a `name@bank` id
    /// - `COD`: nothing extra
    pub fn validate(&self) -> ValidationResult<ValidatedCheckout> {
        let email = validate_email("email", &self.email)?;
        let first_name = validate_text("first_name", &self.first_name, 100)?;
        let last_name = validate_text("last_name", &self.last_name, 100)?;
        let address = validate_text("address", &self.address, 300)?;
        let city = validate_text("city", &self.city, 100)?;
        let state = validate_text("state", &self.state, 100)?;
        let zip_code = validate_pin_code("zip_code", &self.zip_code)?;
        let phone = validate_phone("phone", &self.phone)?;

        let payment_method = self.payment_method.ok_or_else(|| ValidationError::Required {
            field: "payment_method".to_string(),
        })?;

        let payment_reference = match payment_method {
            PaymentMethod::Card => {
                let digits = validate_card_number("card_number", field(&self.card_number))?;
                validate_expiry("expiry_date", field(&self.expiry_date))?;
                validate_cvv("cvv", field(&self.cvv))?;
                validate_text("name_on_card", field(&self.name_on_card), 100)?;
                Some(format!("**** {}", &digits[digits.len() - 4..]))
            }
            PaymentMethod::Upi => Some(validate_upi_id("upi_id", field(&self.upi_id))?),
            PaymentMethod::Cod => None,
        };

        Ok(ValidatedCheckout {
            customer_name: format!("{} {}", first_name, last_name),
            email,
            phone,
            shipping_address: format!("{}, {}, {} {}", address, city, state, zip_code),
            payment_method,
            payment_reference,
        })
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

// =============================================================================
// Order Draft
// =============================================================================

/// Everything needed to persist an order, computed without I/O.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub checkout: ValidatedCheckout,
    pub items: Vec<CartItem>,
    pub breakdown: PriceBreakdown,
    pub placed_at: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
}

impl OrderDraft {
    /// Snapshots the cart and quotes it.
    ///
    /// ## Errors
    /// [`CoreError::EmptyCart`] when there's nothing to buy.
    pub fn new(
        checkout: ValidatedCheckout,
        cart: &CartState,
        policy: &PricingPolicy,
        placed_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        Ok(OrderDraft {
            checkout,
            items: cart.items().to_vec(),
            breakdown: policy.quote(cart.total()),
            placed_at,
            estimated_delivery: placed_at + Duration::days(DELIVERY_DAYS),
        })
    }

    /// Order numbers to try, in order, until one is free.
    ///
    /// The first is derived from the placement time; later ones step
    /// forward so a collision retries with a neighbouring number.
    pub fn order_number_candidates(&self) -> impl Iterator<Item = String> {
        let seed = self.placed_at.timestamp_millis();
        (0..8).map(move |offset| order_number(seed + offset))
    }
}

/// "FS" followed by the last six digits of `seed`.
///
/// ```rust
/// use furnish_core::checkout::order_number;
///
/// assert_eq!(order_number(1_705_312_123_456), "FS123456");
/// assert_eq!(order_number(42), "FS000042");
/// ```
pub fn order_number(seed: i64) -> String {
    format!("{}{:06}", ORDER_NUMBER_PREFIX, seed.rem_euclid(1_000_000))
}

/// True for strings shaped like an order number.
pub fn is_order_number(value: &str) -> bool {
    value
        .strip_prefix(ORDER_NUMBER_PREFIX)
        .is_some_and(|digits| digits.len() == 6 && digits.chars().all(|c| c.is_ascii_digit()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartAction, CartProduct};
    use crate::money::Money;
    use chrono::TimeZone;

    fn form(method: PaymentMethod) -> CheckoutForm {
        CheckoutForm {
            email: "john@example.com".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            address: "123 Main Street".into(),
            city: "Bangalore".into(),
            state: "Karnataka".into(),
            zip_code: "560001".into(),
            phone: "+91 9876543210".into(),
            payment_method: Some(method),
            ..Default::default()
        }
    }

    fn cart_with(price_major: i64, qty: i64) -> CartState {
        CartState::new()
            .reduce(CartAction::AddItem(CartProduct {
                id: "p1".into(),
                name: "Bookshelf".into(),
                price: Money::from_major(price_major),
                image_url: None,
            }))
            .reduce(CartAction::UpdateQuantity {
                id: "p1".into(),
                quantity: qty,
            })
    }

    #[test]
    fn test_cod_needs_no_payment_fields() {
        let checkout = form(PaymentMethod::Cod).validate().unwrap();
        assert_eq!(checkout.customer_name, "John Doe");
        assert_eq!(
            checkout.shipping_address,
            "123 Main Street, Bangalore, Karnataka 560001"
        );
        assert_eq!(checkout.payment_reference, None);
    }

    #[test]
    fn test_card_requires_card_fields() {
        let mut card = form(PaymentMethod::Card);
        let err = card.validate().unwrap_err();
        assert_eq!(err.field(), "card_number");

        card.card_number = Some("4111 1111 1111 1111".into());
        card.expiry_date = Some("12/29".into());
        card.cvv = Some("123".into());
        card.name_on_card = Some("John Doe".into());
        let checkout = card.validate().unwrap();
        assert_eq!(checkout.payment_reference.as_deref(), Some("**** 1111"));
    }

    #[test]
    fn test_upi_requires_upi_id() {
        let mut upi = form(PaymentMethod::Upi);
        assert_eq!(upi.validate().unwrap_err().field(), "upi_id");

        upi.upi_id = Some("john@okbank".into());
        assert_eq!(
            upi.validate().unwrap().payment_reference.as_deref(),
            Some("john@okbank")
        );
    }

    #[test]
    fn test_missing_fields_are_named() {
        let mut missing_city = form(PaymentMethod::Cod);
        missing_city.city = "  ".into();
        assert_eq!(missing_city.validate().unwrap_err().field(), "city");

        let mut bad_pin = form(PaymentMethod::Cod);
        bad_pin.zip_code = "5600".into();
        assert_eq!(bad_pin.validate().unwrap_err().field(), "zip_code");

        let mut no_method = form(PaymentMethod::Cod);
        no_method.payment_method = None;
        assert_eq!(no_method.validate().unwrap_err().field(), "payment_method");

        let empty: CheckoutForm = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.validate().unwrap_err().field(), "email");
    }

    #[test]
    fn test_draft_quotes_cart() {
        let placed_at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let checkout = form(PaymentMethod::Cod).validate().unwrap();
        let draft =
            OrderDraft::new(checkout, &cart_with(500, 3), &PricingPolicy::default(), placed_at)
                .unwrap();

        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.breakdown.subtotal, Money::from_major(1500));
        assert_eq!(draft.breakdown.total, Money::from_major(1970));
        assert_eq!(
            draft.estimated_delivery,
            Utc.with_ymd_and_hms(2024, 1, 22, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_draft_rejects_empty_cart() {
        let checkout = form(PaymentMethod::Cod).validate().unwrap();
        let result = OrderDraft::new(checkout, &CartState::new(), &PricingPolicy::default(), Utc::now());
        assert!(matches!(result, Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_order_numbers() {
        assert_eq!(order_number(1_705_312_123_456), "FS123456");
        assert_eq!(order_number(999_999 + 1), "FS000000");
        assert!(is_order_number("FS123456"));
        assert!(!is_order_number("FS12345"));
        assert!(!is_order_number("XX123456"));
        assert!(!is_order_number("FS12345a"));
    }

    #[test]
    fn test_order_number_candidates_are_distinct() {
        let placed_at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let checkout = form(PaymentMethod::Cod).validate().unwrap();
        let draft =
            OrderDraft::new(checkout, &cart_with(100, 1), &PricingPolicy::default(), placed_at)
                .unwrap();

        let candidates: Vec<String> = draft.order_number_candidates().collect();
        assert_eq!(candidates.len(), 8);
        assert!(candidates.iter().all(|n| is_order_number(n)));
        let mut unique = candidates.clone();
        unique.dedup();
        assert_eq!(unique.len(), candidates.len());
    }
}
