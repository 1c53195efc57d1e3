//! # Checkout Endpoint
//!
//! ```text
//! POST /api/carts/{cart_id}/checkout  (CheckoutForm)
//!        │
//!        ▼
//!   snapshot cart ── empty? ──► 422 CART_ERROR
//!        │
//!        ▼
//!   CheckoutForm::validate ── bad field? ──► 400 VALIDATION_ERROR
//!        │
//!        ▼
//!   OrderDraft::new (quote with the shared PricingPolicy)
//!        │
//!        ▼
//!   sleep(processing_delay)          simulated payment, never fails
//!        │
//!        ▼
//!   OrderRepository::create ──► dispatch(CLEAR_CART) ──► 201 confirmation
//! ```
//!
//! The cart is cleared only after the order is stored, so a database
//! failure leaves the customer's cart intact for a retry.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use furnish_core::cart::CartItem;
use furnish_core::checkout::{CheckoutForm, OrderDraft};
use furnish_core::{CartAction, CoreError, OrderStatus, PaymentMethod, PaymentStatus, PriceBreakdown};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::{AppState, CartSessions};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    /// Masked card or UPI id; shown once, never stored.
    pub payment_reference: Option<String>,
    pub customer_name: String,
    pub email: String,
    pub items: Vec<CartItem>,
    pub pricing: PriceBreakdown,
    pub formatted_total: String,
    pub placed_at: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
}

/// POST /api/carts/{cart_id}/checkout
#[tracing::instrument(skip(state, form))]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(cart_id): Path<String>,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<OrderConfirmation>), ApiError> {
    let cart = state
        .carts
        .snapshot(&cart_id)
        .ok_or_else(|| ApiError::not_found("Cart", &cart_id))?;

    if cart.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let checkout = form.validate()?;
    let draft = OrderDraft::new(checkout, &cart, &state.pricing, Utc::now())?;

    let delay = state.config.checkout_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let order = state.db.orders().create(&draft).await?;
    clear_after_order(&state.carts, &cart_id, &order.order_number);

    info!(
        cart_id = %cart_id,
        order_number = %order.order_number,
        payment_method = %order.payment_method,
        "Checkout complete"
    );

    let confirmation = OrderConfirmation {
        formatted_total: state.config.format_currency(order.total_minor),
        order_number: order.order_number,
        status: order.status,
        payment_method: order.payment_method,
        payment_status: order.payment_status,
        payment_reference: draft.checkout.payment_reference,
        customer_name: order.customer_name,
        email: order.customer_email,
        items: draft.items,
        pricing: draft.breakdown,
        placed_at: draft.placed_at,
        estimated_delivery: draft.estimated_delivery,
    };

    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// Empties the session once its order is stored. Returns false when the
/// session no longer exists; the order stands either way.
fn clear_after_order(carts: &CartSessions, cart_id: &str, order_number: &str) -> bool {
    let cleared = carts.dispatch(cart_id, CartAction::ClearCart).is_some();
    if !cleared {
        warn!(
            cart_id = %cart_id,
            order_number = %order_number,
            "Cart session vanished during checkout, nothing to clear"
        );
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use furnish_core::cart::CartProduct;
    use furnish_core::Money;

    #[test]
    fn test_clear_after_order_empties_live_session() {
        let carts = CartSessions::default();
        let cart_id = carts.create();
        carts.dispatch(
            &cart_id,
            CartAction::AddItem(CartProduct {
                id: "bookshelf".into(),
                name: "Bookshelf".into(),
                price: Money::from_major(1500),
                image_url: None,
            }),
        );

        assert!(clear_after_order(&carts, &cart_id, "FS000001"));
        assert!(carts.snapshot(&cart_id).unwrap().is_empty());
    }

    #[test]
    fn test_clear_after_order_reports_missing_session() {
        let carts = CartSessions::default();
        assert!(!clear_after_order(&carts, "gone", "FS000002"));
        assert!(carts.is_empty());
    }
}
