use async_trait::async_trait;
use chrono::Utc;
use encore_core::sync::{SyncJob, SyncQueue, SyncStatus};
use encore_core::CoreResult;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    jobs: HashMap<Uuid, SyncJob>,
    // Every enqueue ever made, for observability and tests.
    log: Vec<Uuid>,
}

/// In-memory retryable sync job queue, one live job per booking. Enqueueing
/// again re-triggers a booking that was already synced.
pub struct MemorySyncQueue {
    inner: Mutex<Inner>,
}

impl MemorySyncQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    pub async fn job(&self, booking_id: Uuid) -> Option<SyncJob> {
        self.inner.lock().await.jobs.get(&booking_id).cloned()
    }

    /// How many times this booking has been triggered for sync.
    pub async fn trigger_count(&self, booking_id: Uuid) -> usize {
        self.inner
            .lock()
            .await
            .log
            .iter()
            .filter(|id| **id == booking_id)
            .count()
    }
}

impl Default for MemorySyncQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncQueue for MemorySyncQueue {
    async fn enqueue(&self, booking_id: Uuid) -> CoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.log.push(booking_id);
        let job = inner.jobs.entry(booking_id).or_insert_with(|| SyncJob {
            booking_id,
            status: SyncStatus::Pending,
            attempts: 0,
            last_error: None,
            enqueued_at: Utc::now(),
        });
        // Re-trigger regardless of any earlier outcome.
        job.status = SyncStatus::Pending;
        job.enqueued_at = Utc::now();
        Ok(())
    }

    async fn pending(&self) -> CoreResult<Vec<SyncJob>> {
        Ok(self
            .inner
            .lock()
            .await
            .jobs
            .values()
            .filter(|j| j.status == SyncStatus::Pending)
            .cloned()
            .collect())
    }

    async fn record_attempt(
        &self,
        booking_id: Uuid,
        outcome: Result<(), String>,
        max_attempts: u32,
    ) -> CoreResult<()> {
        let mut inner = self.inner.lock().await;
        let Some(job) = inner.jobs.get_mut(&booking_id) else {
            return Ok(());
        };
        job.attempts += 1;
        match outcome {
            Ok(()) => {
                job.status = SyncStatus::Acked;
                job.last_error = None;
                info!("Sync acked for booking {}", booking_id);
            }
            Err(e) => {
                job.last_error = Some(e.clone());
                if job.attempts >= max_attempts {
                    job.status = SyncStatus::Failed;
                    warn!(
                        "Sync failed permanently for booking {} after {} attempts: {}",
                        booking_id, job.attempts, e
                    );
                } else {
                    job.status = SyncStatus::Pending;
                }
            }
        }
        Ok(())
    }
}
