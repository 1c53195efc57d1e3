//! Public store settings for the frontend.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use furnish_core::PricingPolicy;
use serde::Serialize;

use crate::state::AppState;

/// What the browser needs to render prices the way checkout will charge them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub store_name: String,
    pub currency_code: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    pub pricing: PricingPolicy,
    /// e.g. "₹2000.00"
    pub free_shipping_label: String,
    pub tax_percentage: f64,
}

/// GET /api/config
pub async fn get(State(state): State<Arc<AppState>>) -> Json<PublicConfig> {
    let store = &state.config.store;

    Json(PublicConfig {
        store_name: store.name.clone(),
        currency_code: store.currency_code.clone(),
        currency_symbol: store.currency_symbol.clone(),
        currency_decimals: store.currency_decimals,
        pricing: state.pricing,
        free_shipping_label: state
            .config
            .format_currency(state.pricing.free_shipping_threshold.minor()),
        tax_percentage: state.pricing.tax_rate.percentage(),
    })
}
