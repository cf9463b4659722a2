use crate::booking::{BookingRecord, BookingStatus, EventWindow};
use async_trait::async_trait;
use encore_core::CoreResult;
use uuid::Uuid;

/// Repository contract for the booking calendar. Implementations must make
/// `create_if_no_overlap` a single indivisible operation: the overlap check
/// and the insert may not be separated, or concurrent submissions for one
/// slot could both succeed.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Non-cancelled bookings on the resource overlapping the window.
    async fn find_overlapping(
        &self,
        resource_id: i64,
        window: &EventWindow,
    ) -> CoreResult<Vec<BookingRecord>>;

    /// Atomic check-and-create. The idempotency token must be accepted
    /// exactly once; replaying it returns the originally created record.
    /// Returns `CoreError::Conflict` when the slot is already taken.
    async fn create_if_no_overlap(
        &self,
        record: BookingRecord,
        idempotency_token: &str,
    ) -> CoreResult<BookingRecord>;

    async fn get(&self, id: Uuid) -> CoreResult<Option<BookingRecord>>;

    async fn find_by_token(&self, idempotency_token: &str) -> CoreResult<Option<BookingRecord>>;

    /// Transition a booking's status, enforcing the monotonic progression.
    async fn update_status(&self, id: Uuid, status: BookingStatus) -> CoreResult<BookingRecord>;
}
