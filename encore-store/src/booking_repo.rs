use async_trait::async_trait;
use encore_booking::booking::{BookingRecord, BookingStatus, EventWindow};
use encore_booking::repository::BookingRepository;
use encore_core::{CoreError, CoreResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    bookings: HashMap<Uuid, BookingRecord>,
    tokens: HashMap<String, Uuid>,
}

/// In-memory booking calendar. One mutex guards both the calendar and the
/// idempotency ledger, making `create_if_no_overlap` a single critical
/// section per the repository contract.
pub struct MemoryBookingRepository {
    inner: Mutex<Inner>,
    offline: AtomicBool,
}

impl MemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate the calendar store being unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> CoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CoreError::Transport("calendar store unreachable".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn overlapping<'a>(
    inner: &'a Inner,
    resource_id: i64,
    window: &'a EventWindow,
) -> impl Iterator<Item = &'a BookingRecord> {
    inner.bookings.values().filter(move |b| {
        b.resource_id == resource_id
            && b.status != BookingStatus::Cancelled
            && b.window.overlaps(window)
    })
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn find_overlapping(
        &self,
        resource_id: i64,
        window: &EventWindow,
    ) -> CoreResult<Vec<BookingRecord>> {
        self.check_online()?;
        let inner = self.inner.lock().await;
        Ok(overlapping(&inner, resource_id, window).cloned().collect())
    }

    async fn create_if_no_overlap(
        &self,
        record: BookingRecord,
        idempotency_token: &str,
    ) -> CoreResult<BookingRecord> {
        self.check_online()?;
        let mut inner = self.inner.lock().await;

        if let Some(existing_id) = inner.tokens.get(idempotency_token) {
            let existing = inner
                .bookings
                .get(existing_id)
                .cloned()
                .ok_or_else(|| CoreError::Internal("token maps to missing booking".to_string()))?;
            return Ok(existing);
        }

        if let Some(taken) = overlapping(&inner, record.resource_id, &record.window).next() {
            return Err(CoreError::Conflict(format!(
                "resource {} already booked on {} (booking {})",
                record.resource_id, record.window.date, taken.id
            )));
        }

        inner
            .tokens
            .insert(idempotency_token.to_string(), record.id);
        inner.bookings.insert(record.id, record.clone());
        info!("Booking {} stored for resource {}", record.id, record.resource_id);
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<BookingRecord>> {
        self.check_online()?;
        Ok(self.inner.lock().await.bookings.get(&id).cloned())
    }

    async fn find_by_token(&self, idempotency_token: &str) -> CoreResult<Option<BookingRecord>> {
        self.check_online()?;
        let inner = self.inner.lock().await;
        Ok(inner
            .tokens
            .get(idempotency_token)
            .and_then(|id| inner.bookings.get(id))
            .cloned())
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> CoreResult<BookingRecord> {
        self.check_online()?;
        let mut inner = self.inner.lock().await;
        let record = inner
            .bookings
            .get_mut(&id)
            .ok_or_else(|| CoreError::NotFound(format!("booking {id}")))?;
        record.transition(status)?;
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use encore_shared::Money;
    use std::sync::Arc;

    fn record(resource_id: i64, date: NaiveDate) -> BookingRecord {
        BookingRecord {
            id: Uuid::new_v4(),
            resource_id,
            window: EventWindow::new(
                date,
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            ),
            event_type: "wedding".to_string(),
            client_name: "Jo Client".to_string(),
            client_email: "jo@example.com".to_string(),
            client_phone: None,
            venue_postcode: "AL1 1AA".to_string(),
            status: BookingStatus::Pending,
            total: Money::new(40000, "GBP"),
            deposit: Money::new(10000, "GBP"),
            travel_cost: Money::zero("GBP"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_same_slot_conflicts() {
        let repo = MemoryBookingRepository::new();
        repo.create_if_no_overlap(record(5, date()), "tok-1")
            .await
            .unwrap();
        let err = repo
            .create_if_no_overlap(record(5, date()), "tok-2")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_cancelled_booking_frees_slot() {
        let repo = MemoryBookingRepository::new();
        let first = repo
            .create_if_no_overlap(record(5, date()), "tok-1")
            .await
            .unwrap();
        repo.update_status(first.id, BookingStatus::Cancelled)
            .await
            .unwrap();
        assert!(repo
            .create_if_no_overlap(record(5, date()), "tok-2")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_token_replay_returns_original() {
        let repo = MemoryBookingRepository::new();
        let first = repo
            .create_if_no_overlap(record(5, date()), "tok-1")
            .await
            .unwrap();
        // Same token, different candidate record: no second booking.
        let replay = repo
            .create_if_no_overlap(record(5, date()), "tok-1")
            .await
            .unwrap();
        assert_eq!(first.id, replay.id);
        assert_eq!(
            repo.find_overlapping(5, &EventWindow::whole_day(date()))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_concurrent_submissions_one_winner() {
        let repo = Arc::new(MemoryBookingRepository::new());
        let a = {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create_if_no_overlap(record(5, date()), "tok-a").await })
        };
        let b = {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create_if_no_overlap(record(5, date()), "tok-b").await })
        };
        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(CoreError::Conflict(_))))
            .count();
        assert_eq!((successes, conflicts), (1, 1));
    }

    #[tokio::test]
    async fn test_offline_yields_transport_error() {
        let repo = MemoryBookingRepository::new();
        repo.set_offline(true);
        let err = repo
            .find_overlapping(5, &EventWindow::whole_day(date()))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Transport(_)));
    }
}
