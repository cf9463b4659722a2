use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use encore_core::CoreError;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/sync/{booking_id}", post(sync_booking))
}

/// Manual trigger for the CRM push. Failures surface as retryable transport
/// errors; routine retries belong to the background worker.
async fn sync_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = state
        .repo
        .get(booking_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("booking {booking_id}")))?;

    state.sync_gateway.push(&record.sync_summary()).await?;
    state
        .sync_queue
        .record_attempt(booking_id, Ok(()), u32::MAX)
        .await?;

    Ok(Json(json!({
        "success": true,
        "booking_id": booking_id,
        "acked": true,
    })))
}
