//! # Orders After Checkout
//!
//! Tracking timeline and the return/replacement rules.
//!
//! ## Tracking Timeline
//! ```text
//! processing:  [✓] Order Placed  [✓] Confirmed  [ ] Shipped  [ ] Delivered
//! shipped:     [✓] Order Placed  [✓] Confirmed  [✓] Shipped  [ ] Delivered
//! delivered:   [✓] Order Placed  [✓] Confirmed  [✓] Shipped  [✓] Delivered
//! cancelled:   [✓] Order Placed  [✓] Cancelled
//! ```
//!
//! ## Return Window
//! Only delivered orders placed within the last 30 days may be returned or
//! replaced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Order, OrderStatus};
use crate::validation::{validate_email, validate_phone, validate_text, ValidationResult};
use crate::RETURN_WINDOW_DAYS;

// =============================================================================
// Tracking
// =============================================================================

/// One row of the order tracking timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TrackingStep {
    pub status: String,
    pub description: String,
    #[ts(as = "Option<String>")]
    pub occurred_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl TrackingStep {
    fn new(status: &str, description: &str, occurred_at: Option<DateTime<Utc>>, completed: bool) -> Self {
        TrackingStep {
            status: status.to_string(),
            description: description.to_string(),
            occurred_at,
            completed,
        }
    }
}

/// Builds the tracking timeline from the order's current status.
pub fn tracking_timeline(order: &Order) -> Vec<TrackingStep> {
    let placed = Some(order.created_at);

    if order.status == OrderStatus::Cancelled {
        return vec![
            TrackingStep::new("Order Placed", "Your order has been placed successfully", placed, true),
            TrackingStep::new("Cancelled", "This order was cancelled", None, true),
        ];
    }

    let reached = match order.status {
        OrderStatus::Processing => 2,
        OrderStatus::Shipped => 3,
        OrderStatus::Delivered => 4,
        OrderStatus::Cancelled => 0,
    };

    let delivered_at = match order.status {
        OrderStatus::Delivered => order.estimated_delivery,
        _ => None,
    };

    vec![
        TrackingStep::new("Order Placed", "Your order has been placed successfully", placed, true),
        TrackingStep::new(
            "Order Confirmed",
            "Your order has been confirmed and is being prepared",
            placed,
            reached >= 2,
        ),
        TrackingStep::new("Shipped", "Your order is on its way to you", None, reached >= 3),
        TrackingStep::new("Delivered", "Order delivered successfully", delivered_at, reached >= 4),
    ]
}

// =============================================================================
// Returns
// =============================================================================

/// Checks whether an order may be returned or replaced at `now`.
///
/// ## Errors
/// [`CoreError::ReturnNotAllowed`] with the reason.
pub fn check_return_eligibility(order: &Order, now: DateTime<Utc>) -> CoreResult<()> {
    let refuse = |reason: &str| CoreError::ReturnNotAllowed {
        order_number: order.order_number.clone(),
        reason: reason.to_string(),
    };

    if order.status != OrderStatus::Delivered {
        return Err(refuse("order has not been delivered"));
    }

    let days_since_order = (now - order.created_at).num_days();
    if days_since_order > RETURN_WINDOW_DAYS {
        return Err(refuse("the 30-day return window has passed"));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ReturnKind {
    /// Refund after pickup.
    Return,
    /// Send the same item again.
    Replacement,
}

/// Reasons offered on the return form.
pub const RETURN_REASONS: &[&str] = &[
    "Damaged during delivery",
    "Wrong item received",
    "Quality issues",
    "Size/dimension mismatch",
    "Changed mind",
    "Defective product",
    "Other",
];

/// The return/replacement form as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct ReturnRequestForm {
    pub kind: Option<ReturnKind>,
    pub reason: String,
    pub description: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
}

/// A return form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedReturn {
    pub kind: ReturnKind,
    pub reason: String,
    pub description: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
}

impl ReturnRequestForm {
    pub fn validate(&self) -> ValidationResult<ValidatedReturn> {
        let kind = self.kind.ok_or_else(|| ValidationError::Required {
            field: "kind".to_string(),
        })?;

        let reason = validate_text("reason", &self.reason, 100)?;
        if !RETURN_REASONS.contains(&reason.as_str()) {
            return Err(ValidationError::NotAllowed {
                field: "reason".to_string(),
                allowed: RETURN_REASONS.iter().map(|r| r.to_string()).collect(),
            });
        }

        Ok(ValidatedReturn {
            kind,
            reason,
            description: validate_text("description", &self.description, 2000)?,
            contact_name: validate_text("contact_name", &self.contact_name, 100)?,
            contact_email: validate_email("contact_email", &self.contact_email)?,
            contact_phone: validate_phone("contact_phone", &self.contact_phone)?,
        })
    }
}

/// A stored return/replacement request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReturnRequest {
    pub id: String,
    pub order_id: String,
    pub kind: ReturnKind,
    pub reason: String,
    pub description: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Prefills the return form's contact section from the order.
pub fn return_form_for(order: &Order) -> ReturnRequestForm {
    ReturnRequestForm {
        kind: None,
        reason: String::new(),
        description: String::new(),
        contact_name: order.customer_name.clone(),
        contact_email: order.customer_email.clone(),
        contact_phone: order.customer_phone.clone(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, PaymentStatus};
    use chrono::{Duration, TimeZone};

    fn order(status: OrderStatus) -> Order {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        Order {
            id: "o1".into(),
            order_number: "FS123456".into(),
            status,
            payment_method: PaymentMethod::Upi,
            payment_status: PaymentStatus::Paid,
            customer_name: "John Doe".into(),
            customer_email: "john@example.com".into(),
            customer_phone: "+91 9876543210".into(),
            shipping_address: "123 Main Street, Bangalore, Karnataka 560001".into(),
            subtotal_minor: 4_500_000,
            shipping_minor: 0,
            tax_minor: 810_000,
            total_minor: 5_310_000,
            tracking_number: Some("TRK789012345".into()),
            created_at: created,
            estimated_delivery: Some(created + Duration::days(7)),
        }
    }

    #[test]
    fn test_timeline_follows_status() {
        let completed = |status| -> Vec<bool> {
            tracking_timeline(&order(status))
                .iter()
                .map(|s| s.completed)
                .collect()
        };

        assert_eq!(completed(OrderStatus::Processing), vec![true, true, false, false]);
        assert_eq!(completed(OrderStatus::Shipped), vec![true, true, true, false]);
        assert_eq!(completed(OrderStatus::Delivered), vec![true, true, true, true]);

        let cancelled = tracking_timeline(&order(OrderStatus::Cancelled));
        assert_eq!(cancelled.len(), 2);
        assert_eq!(cancelled[1].status, "Cancelled");
    }

    #[test]
    fn test_return_window() {
        let delivered = order(OrderStatus::Delivered);
        let day_10 = delivered.created_at + Duration::days(10);
        let day_30 = delivered.created_at + Duration::days(30);
        let day_31 = delivered.created_at + Duration::days(31);

        assert!(check_return_eligibility(&delivered, day_10).is_ok());
        assert!(check_return_eligibility(&delivered, day_30).is_ok());
        assert!(matches!(
            check_return_eligibility(&delivered, day_31),
            Err(CoreError::ReturnNotAllowed { .. })
        ));
    }

    #[test]
    fn test_undelivered_orders_cannot_be_returned() {
        let shipped = order(OrderStatus::Shipped);
        let err = check_return_eligibility(&shipped, shipped.created_at).unwrap_err();
        assert!(err.to_string().contains("not been delivered"));
    }

    #[test]
    fn test_return_form_validation() {
        let mut form = return_form_for(&order(OrderStatus::Delivered));
        assert_eq!(form.validate().unwrap_err().field(), "kind");

        form.kind = Some(ReturnKind::Replacement);
        form.reason = "Bored of it".into();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::NotAllowed { .. })
        ));

        form.reason = "Damaged during delivery".into();
        assert_eq!(form.validate().unwrap_err().field(), "description");

        form.description = "Left armrest cracked".into();
        let valid = form.validate().unwrap();
        assert_eq!(valid.kind, ReturnKind::Replacement);
        assert_eq!(valid.contact_email, "john@example.com");
    }
}
