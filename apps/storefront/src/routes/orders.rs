//! # Order Endpoints
//!
//! Order history, the tracking page and return/replacement requests.
//!
//! Order numbers in paths are case-insensitive (`fs123456` finds
//! `FS123456`).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use furnish_core::orders::{
    check_return_eligibility, return_form_for, tracking_timeline, ReturnRequest,
    ReturnRequestForm, TrackingStep, RETURN_REASONS,
};
use furnish_core::{CoreError, Order, OrderItem};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 20;
const MAX_HISTORY_LIMIT: i64 = 100;

// -- Request types --

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub item_count: i64,
    pub formatted_total: String,
}

/// Whether the return form should be offered, and if not, why.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnEligibility {
    pub eligible: bool,
    pub reason: Option<String>,
    /// Contact fields prefilled from the order.
    pub form: ReturnRequestForm,
    pub reasons: &'static [&'static str],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub summary: OrderSummary,
    pub timeline: Vec<TrackingStep>,
    pub returns: ReturnEligibility,
    pub return_requests: Vec<ReturnRequest>,
}

// -- Helpers --

async fn find_order(state: &AppState, order_number: &str) -> Result<Order, ApiError> {
    let number = order_number.trim().to_uppercase();
    state
        .db
        .orders()
        .get_by_number(&number)
        .await?
        .ok_or_else(|| CoreError::OrderNotFound(number).into())
}

async fn summarize(state: &AppState, order: Order) -> Result<OrderSummary, ApiError> {
    let items = state.db.orders().items(&order.id).await?;
    Ok(OrderSummary {
        item_count: items.iter().map(|item| item.quantity).sum(),
        formatted_total: state.config.format_currency(order.total_minor),
        items,
        order,
    })
}

// -- Handlers --

/// GET /api/orders: newest first.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<OrderSummary>>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let orders = state.db.orders().list_recent(limit).await?;
    debug!(count = orders.len(), "Order history");

    let mut summaries = Vec::with_capacity(orders.len());
    for order in orders {
        summaries.push(summarize(&state, order).await?);
    }

    Ok(Json(summaries))
}

/// GET /api/orders/{order_number}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(order_number): Path<String>,
) -> Result<Json<OrderDetail>, ApiError> {
    let order = find_order(&state, &order_number).await?;

    let timeline = tracking_timeline(&order);
    let eligibility = check_return_eligibility(&order, Utc::now());
    let returns = ReturnEligibility {
        eligible: eligibility.is_ok(),
        reason: eligibility.err().map(|e| e.to_string()),
        form: return_form_for(&order),
        reasons: RETURN_REASONS,
    };
    let return_requests = state.db.orders().returns_for(&order.id).await?;

    Ok(Json(OrderDetail {
        summary: summarize(&state, order).await?,
        timeline,
        returns,
        return_requests,
    }))
}

/// POST /api/orders/{order_number}/returns
///
/// Only delivered orders inside the return window are accepted.
#[tracing::instrument(skip(state, form))]
pub async fn create_return(
    State(state): State<Arc<AppState>>,
    Path(order_number): Path<String>,
    Json(form): Json<ReturnRequestForm>,
) -> Result<(StatusCode, Json<ReturnRequest>), ApiError> {
    let order = find_order(&state, &order_number).await?;

    check_return_eligibility(&order, Utc::now())?;
    let request = form.validate()?;

    let created = state.db.orders().create_return(&order.id, &request).await?;

    info!(
        order_number = %order.order_number,
        kind = ?created.kind,
        "Return request filed"
    );

    Ok((StatusCode::CREATED, Json(created)))
}
