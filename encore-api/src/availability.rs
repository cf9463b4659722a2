use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    resource_id: i64,
    date: NaiveDate,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/availability", get(check_availability))
}

/// Unknown is reported as unavailable: a resource whose status could not be
/// confirmed must not be selectable.
async fn check_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = state.checker.check(query.resource_id, query.date).await;
    Ok(Json(json!({
        "success": true,
        "resource_id": query.resource_id,
        "date": query.date,
        "available": status.selectable(),
        "status": status,
    })))
}
