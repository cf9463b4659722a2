use crate::booking::EventWindow;
use crate::repository::BookingRepository;
use chrono::NaiveDate;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    Available,
    Unavailable,
    Unknown,
}

impl Availability {
    /// Fail closed: a resource whose status could not be confirmed must not
    /// be selectable.
    pub fn selectable(self) -> bool {
        self == Availability::Available
    }
}

/// Conflict query against the booking calendar.
pub struct AvailabilityChecker {
    repo: Arc<dyn BookingRepository>,
}

impl AvailabilityChecker {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo }
    }

    /// Any query failure degrades to Unknown rather than an error; the
    /// caller treats Unknown like Unavailable.
    pub async fn check(&self, resource_id: i64, date: NaiveDate) -> Availability {
        let window = EventWindow::whole_day(date);
        match self.repo.find_overlapping(resource_id, &window).await {
            Ok(existing) if existing.is_empty() => Availability::Available,
            Ok(_) => Availability::Unavailable,
            Err(e) => {
                warn!(
                    "Availability check failed for resource {} on {}: {}",
                    resource_id, date, e
                );
                Availability::Unknown
            }
        }
    }

    /// Probe several candidates for one date. Queries run concurrently and
    /// complete in any order; each result depends only on its own resource.
    pub async fn check_many(
        &self,
        resource_ids: &[i64],
        date: NaiveDate,
    ) -> Vec<(i64, Availability)> {
        let checks = resource_ids.iter().map(|&id| async move {
            (id, self.check(id, date).await)
        });
        join_all(checks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingRecord, BookingStatus};
    use async_trait::async_trait;
    use chrono::{NaiveTime, Utc};
    use encore_core::{CoreError, CoreResult};
    use encore_shared::Money;
    use uuid::Uuid;

    /// Calendar stub: a fixed set of taken (resource, date) slots, or a
    /// simulated outage.
    struct StubRepo {
        taken: Vec<(i64, NaiveDate)>,
        offline: bool,
    }

    fn booked(resource_id: i64, date: NaiveDate) -> BookingRecord {
        BookingRecord {
            id: Uuid::new_v4(),
            resource_id,
            window: EventWindow::new(
                date,
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            ),
            event_type: "party".to_string(),
            client_name: "Taken".to_string(),
            client_email: "taken@example.com".to_string(),
            client_phone: None,
            venue_postcode: "AL1 1AA".to_string(),
            status: BookingStatus::Confirmed,
            total: Money::new(40000, "GBP"),
            deposit: Money::new(10000, "GBP"),
            travel_cost: Money::zero("GBP"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[async_trait]
    impl BookingRepository for StubRepo {
        async fn find_overlapping(
            &self,
            resource_id: i64,
            window: &EventWindow,
        ) -> CoreResult<Vec<BookingRecord>> {
            if self.offline {
                return Err(CoreError::Transport("calendar unreachable".to_string()));
            }
            Ok(self
                .taken
                .iter()
                .filter(|(id, date)| *id == resource_id && *date == window.date)
                .map(|(id, date)| booked(*id, *date))
                .collect())
        }

        async fn create_if_no_overlap(
            &self,
            _record: BookingRecord,
            _idempotency_token: &str,
        ) -> CoreResult<BookingRecord> {
            unimplemented!("not needed for availability tests")
        }

        async fn get(&self, _id: Uuid) -> CoreResult<Option<BookingRecord>> {
            Ok(None)
        }

        async fn find_by_token(&self, _token: &str) -> CoreResult<Option<BookingRecord>> {
            Ok(None)
        }

        async fn update_status(
            &self,
            _id: Uuid,
            _status: BookingStatus,
        ) -> CoreResult<BookingRecord> {
            unimplemented!("not needed for availability tests")
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_booked_resource_unavailable() {
        let checker = AvailabilityChecker::new(Arc::new(StubRepo {
            taken: vec![(5, date())],
            offline: false,
        }));
        let status = checker.check(5, date()).await;
        assert_eq!(status, Availability::Unavailable);
        assert!(!status.selectable());
    }

    #[tokio::test]
    async fn test_free_resource_available() {
        let checker = AvailabilityChecker::new(Arc::new(StubRepo {
            taken: vec![(5, date())],
            offline: false,
        }));
        assert_eq!(checker.check(7, date()).await, Availability::Available);
    }

    #[tokio::test]
    async fn test_query_failure_fails_closed() {
        let checker = AvailabilityChecker::new(Arc::new(StubRepo {
            taken: vec![],
            offline: true,
        }));
        let status = checker.check(5, date()).await;
        assert_eq!(status, Availability::Unknown);
        assert!(!status.selectable());
    }

    #[tokio::test]
    async fn test_fan_out_returns_one_result_per_resource() {
        let checker = AvailabilityChecker::new(Arc::new(StubRepo {
            taken: vec![(5, date())],
            offline: false,
        }));
        let results = checker.check_many(&[3, 5, 9], date()).await;
        assert_eq!(results.len(), 3);
        assert!(results.contains(&(5, Availability::Unavailable)));
        assert!(results.contains(&(3, Availability::Available)));
        assert!(results.contains(&(9, Availability::Available)));
    }
}
