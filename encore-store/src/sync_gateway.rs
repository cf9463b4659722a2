use async_trait::async_trait;
use encore_core::sync::SyncGateway;
use encore_core::{CoreError, CoreResult};
use encore_shared::events::BookingSyncSummary;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::info;

/// In-process stand-in for the CRM collaborator: records every pushed
/// summary and can simulate an outage to exercise the retry path.
pub struct MockCrmGateway {
    received: Mutex<Vec<BookingSyncSummary>>,
    offline: AtomicBool,
}

impl MockCrmGateway {
    pub fn new() -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn received(&self) -> Vec<BookingSyncSummary> {
        self.received.lock().await.clone()
    }
}

impl Default for MockCrmGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncGateway for MockCrmGateway {
    async fn push(&self, summary: &BookingSyncSummary) -> CoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CoreError::Transport("crm unreachable".to_string()));
        }
        info!("CRM sync pushed for booking {}", summary.booking_id);
        self.received.lock().await.push(summary.clone());
        Ok(())
    }
}
