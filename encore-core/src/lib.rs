pub mod postcode;
pub mod validation;
pub mod payment;
pub mod sync;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Slot already booked: {0}")]
    Conflict(String),
    #[error("Upstream unreachable: {0}")]
    Transport(String),
    #[error("Payment failed: {0}")]
    Payment(String),
    #[error("Payment feature not configured: {0}")]
    Configuration(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal service error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Machine-readable code carried in API error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::Conflict(_) => "CONFLICT_ERROR",
            CoreError::Transport(_) => "TRANSPORT_ERROR",
            CoreError::Payment(_) => "PAYMENT_ERROR",
            CoreError::Configuration(_) => "CONFIGURATION_ERROR",
            CoreError::NotFound(_) => "NOT_FOUND",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
