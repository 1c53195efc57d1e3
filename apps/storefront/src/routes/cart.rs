//! # Cart Endpoints
//!
//! Every mutation is one [`CartAction`] dispatched against the session's
//! store; the response is always the full cart with its price quote, so
//! the client never computes totals itself.
//!
//! ```text
//! POST   /api/carts                          → new session
//! GET    /api/carts/{cart_id}                → CartView
//! POST   /api/carts/{cart_id}/items          → ADD_ITEM
//! PUT    /api/carts/{cart_id}/items/{id}     → UPDATE_QUANTITY
//! DELETE /api/carts/{cart_id}/items/{id}     → REMOVE_ITEM
//! DELETE /api/carts/{cart_id}                → CLEAR_CART
//! ```

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use furnish_core::cart::{coerce_quantity, CartPhase, CartProduct};
use furnish_core::validation::validate_quantity;
use furnish_core::{CartAction, CartState, Money, PriceBreakdown, PricingPolicy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
}

/// `quantity` is taken as raw JSON: `3`, `"3"` and `"abc"` are all accepted
/// and coerced.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    #[serde(default)]
    pub quantity: Value,
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub cart_id: String,
    #[serde(flatten)]
    pub cart: CartState,
    /// `empty` or `non_empty`
    pub phase: CartPhase,
    pub pricing: PriceBreakdown,
    /// "Add ₹X more for free shipping"; zero once qualified.
    pub amount_to_free_shipping: Money,
}

impl CartView {
    pub fn new(cart_id: &str, cart: CartState, policy: &PricingPolicy) -> Self {
        let subtotal = cart.total();
        CartView {
            cart_id: cart_id.to_string(),
            phase: cart.phase(),
            pricing: policy.quote(subtotal),
            amount_to_free_shipping: policy.amount_to_free_shipping(subtotal),
            cart,
        }
    }
}

fn cart_not_found(cart_id: &str) -> ApiError {
    ApiError::not_found("Cart", cart_id)
}

fn dispatch(state: &AppState, cart_id: &str, action: CartAction) -> Result<Json<CartView>, ApiError> {
    let cart = state
        .carts
        .dispatch(cart_id, action)
        .ok_or_else(|| cart_not_found(cart_id))?;

    Ok(Json(CartView::new(cart_id, cart, &state.pricing)))
}

// -- Handlers --

/// POST /api/carts
#[tracing::instrument(skip(state))]
pub async fn create(State(state): State<Arc<AppState>>) -> (StatusCode, Json<CartView>) {
    let cart_id = state.carts.create();
    debug!(cart_id = %cart_id, "Cart session opened");

    (
        StatusCode::CREATED,
        Json(CartView::new(&cart_id, CartState::new(), &state.pricing)),
    )
}

/// GET /api/carts/{cart_id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(cart_id): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    let cart = state
        .carts
        .snapshot(&cart_id)
        .ok_or_else(|| cart_not_found(&cart_id))?;

    Ok(Json(CartView::new(&cart_id, cart, &state.pricing)))
}

/// POST /api/carts/{cart_id}/items: adds one unit of a catalog product.
///
/// Name, price and image are copied from the catalog at this moment.
#[tracing::instrument(skip(state, req))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(cart_id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartView>, ApiError> {
    let current = state
        .carts
        .with_cart(&cart_id, |cart| cart.quantity_of(&req.product_id))
        .ok_or_else(|| cart_not_found(&cart_id))?;

    let product = state.db.products().require(&req.product_id).await?;

    if !product.in_stock {
        return Err(ApiError::new(
            ErrorCode::BusinessLogic,
            format!("{} is out of stock", product.name),
        ));
    }

    validate_quantity(current + 1)?;

    debug!(product_id = %product.id, "Adding to cart");
    dispatch(&state, &cart_id, CartAction::AddItem(CartProduct::from(&product)))
}

/// PUT /api/carts/{cart_id}/items/{product_id}
///
/// Zero or a negative quantity removes the line.
#[tracing::instrument(skip(state, req))]
pub async fn update_quantity(
    State(state): State<Arc<AppState>>,
    Path((cart_id, product_id)): Path<(String, String)>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>, ApiError> {
    let quantity = validate_quantity(coerce_quantity(&req.quantity))?;

    debug!(product_id = %product_id, quantity, "Updating cart quantity");
    dispatch(
        &state,
        &cart_id,
        CartAction::UpdateQuantity {
            id: product_id,
            quantity,
        },
    )
}

/// DELETE /api/carts/{cart_id}/items/{product_id}
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((cart_id, product_id)): Path<(String, String)>,
) -> Result<Json<CartView>, ApiError> {
    dispatch(&state, &cart_id, CartAction::RemoveItem(product_id))
}

/// DELETE /api/carts/{cart_id}
#[tracing::instrument(skip(state))]
pub async fn clear(
    State(state): State<Arc<AppState>>,
    Path(cart_id): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    dispatch(&state, &cart_id, CartAction::ClearCart)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_view_quotes_subtotal() {
        let cart = CartState::new().reduce(CartAction::AddItem(CartProduct {
            id: "bookshelf".into(),
            name: "Bookshelf".into(),
            price: Money::from_major(1500),
            image_url: None,
        }));

        let view = CartView::new("c1", cart, &PricingPolicy::default());
        assert_eq!(view.pricing.total, Money::from_major(1970));
        assert_eq!(view.amount_to_free_shipping, Money::from_major(500));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["cartId"], "c1");
        assert_eq!(json["itemCount"], 1);
        assert_eq!(json["pricing"]["shipping"], 20_000);
        assert_eq!(json["phase"], "non_empty");
    }
}
