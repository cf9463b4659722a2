use axum::{extract::State, routing::post, Json, Router};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/admin/distance-cache/clear", post(clear_distance_cache))
}

/// Administrative clear: removes every cached distance unconditionally.
async fn clear_distance_cache(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = state.calculator.cache().clear().await;
    Ok(Json(json!({
        "success": true,
        "cleared": true,
        "entries_removed": removed,
    })))
}
