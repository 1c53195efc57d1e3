//! Ad-hoc price quotes with the store's shipping and GST policy.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use furnish_core::{Money, PriceBreakdown};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    /// Major units, e.g. `1500` or `1499.50`.
    pub subtotal: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub breakdown: PriceBreakdown,
    pub amount_to_free_shipping: Money,
    pub formatted_total: String,
}

/// GET /api/pricing/quote?subtotal=1500
#[tracing::instrument(skip(state))]
pub async fn quote(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuoteParams>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let raw = params.subtotal.unwrap_or_default();
    let subtotal = Money::parse_major(&raw)
        .filter(|amount| amount.minor() >= 0)
        .ok_or_else(|| ApiError::validation(format!("subtotal '{}' is not an amount", raw)))?;

    let breakdown = state.pricing.quote(subtotal);

    Ok(Json(QuoteResponse {
        formatted_total: state.config.format_currency(breakdown.total.minor()),
        amount_to_free_shipping: state.pricing.amount_to_free_shipping(subtotal),
        breakdown,
    }))
}
