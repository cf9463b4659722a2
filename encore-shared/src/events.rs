use crate::money::Money;
use uuid::Uuid;

/// Booking summary pushed to the CRM collaborator.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingSyncSummary {
    pub booking_id: Uuid,
    pub resource_id: i64,
    pub event_date: chrono::NaiveDate,
    pub client_name: String,
    pub client_email: String,
    pub status: String,
    pub total: Money,
}
