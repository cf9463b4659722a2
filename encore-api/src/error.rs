use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use encore_booking::submission::SubmissionError;
use encore_core::validation::FieldError;
use encore_core::CoreError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    FieldErrors(Vec<FieldError>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, field_errors) = match self {
            AppError::Core(err) => {
                let status = match &err {
                    CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                    CoreError::Conflict(_) => StatusCode::CONFLICT,
                    CoreError::Transport(_) => StatusCode::BAD_GATEWAY,
                    CoreError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
                    CoreError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
                    CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                    CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("Internal Server Error: {}", err);
                    (
                        status,
                        err.code(),
                        "Internal Server Error".to_string(),
                        None,
                    )
                } else {
                    (status, err.code(), err.to_string(), None)
                }
            }
            AppError::FieldErrors(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Validation failed".to_string(),
                Some(errors),
            ),
        };

        let mut body = json!({
            "success": false,
            "error": code,
            "message": message,
        });
        if let Some(errors) = field_errors {
            body["field_errors"] = serde_json::to_value(errors).unwrap_or_default();
        }

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Core(err)
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(errors) => AppError::FieldErrors(errors),
            SubmissionError::Core(core) => AppError::Core(core),
        }
    }
}
