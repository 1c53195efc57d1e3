//! Help desk: the FAQ list and support requests.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use furnish_core::support::{Faq, SupportRequest, SupportRequestForm, FAQS};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/support/faqs
pub async fn faqs() -> Json<&'static [Faq]> {
    Json(FAQS)
}

/// POST /api/support/requests
#[tracing::instrument(skip(state, form))]
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SupportRequestForm>,
) -> Result<(StatusCode, Json<SupportRequest>), ApiError> {
    let request = form.validate()?;
    let created = state.db.support().create(&request).await?;

    info!(id = %created.id, kind = ?created.kind, "Support request received");
    Ok((StatusCode::CREATED, Json(created)))
}
