use encore_booking::repository::BookingRepository;
use encore_core::sync::{SyncGateway, SyncQueue};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

/// Background CRM sync: drains pending jobs on a timer and retries failures
/// up to the attempt cap. Runs for the lifetime of the process.
pub async fn start_sync_worker(
    repo: Arc<dyn BookingRepository>,
    queue: Arc<dyn SyncQueue>,
    gateway: Arc<dyn SyncGateway>,
    interval_seconds: u64,
    max_attempts: u32,
) {
    info!(
        "Sync worker started (every {}s, {} attempts max)",
        interval_seconds, max_attempts
    );
    let mut ticker = interval(Duration::from_secs(interval_seconds));
    loop {
        ticker.tick().await;
        if let Err(e) = drain_once(&repo, &queue, &gateway, max_attempts).await {
            error!("Sync worker pass failed: {}", e);
        }
    }
}

/// One worker pass over the pending jobs. Split out so tests can drive it
/// without the timer.
pub async fn drain_once(
    repo: &Arc<dyn BookingRepository>,
    queue: &Arc<dyn SyncQueue>,
    gateway: &Arc<dyn SyncGateway>,
    max_attempts: u32,
) -> encore_core::CoreResult<()> {
    for job in queue.pending().await? {
        let outcome = match repo.get(job.booking_id).await? {
            Some(record) => gateway
                .push(&record.sync_summary())
                .await
                .map_err(|e| e.to_string()),
            None => Err(format!("booking {} no longer exists", job.booking_id)),
        };

        if let Err(ref e) = outcome {
            info!(
                "Sync attempt {} failed for booking {}: {}",
                job.attempts + 1,
                job.booking_id,
                e
            );
        }
        queue
            .record_attempt(job.booking_id, outcome, max_attempts)
            .await?;
    }
    Ok(())
}
