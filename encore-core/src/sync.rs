use crate::CoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use encore_shared::events::BookingSyncSummary;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Pending,
    Acked,
    Failed,
}

/// A queued CRM push for one booking. Retried by the background worker,
/// never inline with the booking flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncJob {
    pub booking_id: Uuid,
    pub status: SyncStatus,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub enqueued_at: DateTime<Utc>,
}

/// Trigger-and-acknowledge contract with the external CRM.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    async fn push(&self, summary: &BookingSyncSummary) -> CoreResult<()>;
}

#[async_trait]
pub trait SyncQueue: Send + Sync {
    async fn enqueue(&self, booking_id: Uuid) -> CoreResult<()>;
    async fn pending(&self) -> CoreResult<Vec<SyncJob>>;
    /// Record the outcome of one push attempt. Failed jobs below the
    /// attempt cap go back to pending.
    async fn record_attempt(
        &self,
        booking_id: Uuid,
        outcome: Result<(), String>,
        max_attempts: u32,
    ) -> CoreResult<()>;
}
