use axum::{extract::State, routing::post, Json, Router};
use encore_booking::orchestrator::PaymentOrchestrator;
use encore_core::payment::{GatewayResult, PaymentType};
use encore_core::CoreError;
use encore_shared::Money;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CreateIntentRequest {
    booking_id: Uuid,
    payment_type: PaymentType,
    amount_pence: i64,
    #[serde(default = "default_currency")]
    currency: String,
}

fn default_currency() -> String {
    "GBP".to_string()
}

#[derive(Debug, Deserialize)]
struct ConfirmRequest {
    intent_id: String,
    gateway_status: GatewayResult,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/payments/intent", post(create_intent))
        .route("/v1/payments/confirm", post(confirm_payment))
}

fn orchestrator(state: &AppState) -> Result<&Arc<PaymentOrchestrator>, AppError> {
    state.payments.as_ref().ok_or_else(|| {
        CoreError::Configuration("payment gateway credentials are not set".to_string()).into()
    })
}

async fn create_intent(
    State(state): State<AppState>,
    Json(req): Json<CreateIntentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let intent = orchestrator(&state)?
        .create_intent(
            req.booking_id,
            req.payment_type,
            Money::new(req.amount_pence, &req.currency),
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "intent_id": intent.id,
        "client_secret": intent.client_secret,
        "amount_pence": intent.amount.amount,
        "currency": intent.amount.currency,
    })))
}

/// Completion callback for the client-side confirmation step: the gateway
/// result is relayed here and reconciled against the booking record.
async fn confirm_payment(
    State(state): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let booking = orchestrator(&state)?
        .confirm(&req.intent_id, req.gateway_status)
        .await?;

    Ok(Json(json!({
        "success": true,
        "booking_id": booking.id,
        "status": booking.status.to_string(),
    })))
}
