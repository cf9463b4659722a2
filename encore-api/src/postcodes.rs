use axum::{extract::Json, routing::post, Router};
use encore_core::postcode;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ValidatePostcodeRequest {
    postcode: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/postcodes/validate", post(validate_postcode))
}

async fn validate_postcode(
    Json(req): Json<ValidatePostcodeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let normalized = postcode::parse(&req.postcode)?;
    Ok(Json(json!({
        "success": true,
        "normalized": normalized,
    })))
}
