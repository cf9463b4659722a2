use crate::CoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use encore_shared::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Deposit,
    Balance,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentStatus {
    Created,
    Confirming,
    Captured,
    Failed,
}

/// One payment attempt against a booking. A failed intent is superseded by
/// a fresh one on retry, never revived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String, // Provider's ID (e.g., pi_123)
    pub booking_id: Uuid,
    pub amount: Money,
    pub payment_type: PaymentType,
    pub status: IntentStatus,
    pub client_secret: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result reported by the gateway for a confirmation attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayResult {
    Succeeded,
    Declined,
}

/// Intent handle returned by the provider at creation time.
#[derive(Debug, Clone)]
pub struct GatewayIntent {
    pub intent_id: String,
    pub client_secret: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent with the provider.
    async fn create_intent(
        &self,
        booking_id: Uuid,
        amount: &Money,
        metadata: serde_json::Value,
    ) -> CoreResult<GatewayIntent>;

    /// Ask the provider to capture a previously created intent.
    async fn capture(&self, intent_id: &str, result: &GatewayResult) -> CoreResult<()>;
}
