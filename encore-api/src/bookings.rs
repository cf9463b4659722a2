use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use encore_booking::booking::{BookingRecord, BookingStatus};
use encore_core::validation::BookingRequest;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CreateBookingApiRequest {
    idempotency_token: String,
    #[serde(flatten)]
    fields: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    success: bool,
    booking_id: Uuid,
    resource_id: i64,
    event_date: chrono::NaiveDate,
    status: String,
    total: String,
    deposit: String,
    travel_cost: String,
}

impl BookingResponse {
    fn from_record(record: &BookingRecord) -> Self {
        Self {
            success: true,
            booking_id: record.id,
            resource_id: record.resource_id,
            event_date: record.window.date,
            status: record.status.to_string(),
            total: record.total.to_string(),
            deposit: record.deposit.to_string(),
            travel_cost: record.travel_cost.to_string(),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingApiRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let request = BookingRequest::from_fields(req.fields);
    let record = state
        .submission
        .submit(&request, &req.idempotency_token)
        .await?;

    // The payment step is only offered when the gateway is configured.
    let redirect_url = state
        .payments
        .as_ref()
        .map(|_| format!("/bookings/{}/pay", record.id));

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "booking_id": record.id,
            "message": format!(
                "Booking received for {}: deposit of {} due to confirm",
                record.window.date, record.deposit
            ),
            "redirect_url": redirect_url,
        })),
    ))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let record = state
        .repo
        .get(id)
        .await?
        .ok_or_else(|| encore_core::CoreError::NotFound(format!("booking {id}")))?;
    Ok(Json(BookingResponse::from_record(&record)))
}

/// Cancellation is idempotent: repeating it on an already-cancelled booking
/// succeeds without another transition.
async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = state
        .repo
        .get(id)
        .await?
        .ok_or_else(|| encore_core::CoreError::NotFound(format!("booking {id}")))?;

    if record.status != BookingStatus::Cancelled {
        state
            .repo
            .update_status(id, BookingStatus::Cancelled)
            .await?;
        if let Err(e) = state.sync_queue.enqueue(id).await {
            tracing::warn!("Failed to enqueue sync for cancelled booking {}: {}", id, e);
        }
        info!("Booking cancelled: {}", id);
    }

    Ok(Json(json!({
        "success": true,
        "booking_id": id,
        "status": BookingStatus::Cancelled.to_string(),
    })))
}
