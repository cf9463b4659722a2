use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use encore_core::{CoreError, CoreResult};
use encore_shared::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    DepositPaid,
    PaidInFull,
    Cancelled,
}

impl BookingStatus {
    /// Position along the payment progression. Cancelled sits outside it.
    fn rank(self) -> Option<u8> {
        match self {
            BookingStatus::Pending => Some(0),
            BookingStatus::Confirmed => Some(1),
            BookingStatus::DepositPaid => Some(2),
            BookingStatus::PaidInFull => Some(3),
            BookingStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::PaidInFull | BookingStatus::Cancelled)
    }

    /// Transitions are monotonic along the progression; skips are allowed,
    /// reversals are not. Cancellation is reachable from any non-terminal
    /// state.
    pub fn can_transition_to(self, to: BookingStatus) -> bool {
        if to == BookingStatus::Cancelled {
            return !self.is_terminal();
        }
        match (self.rank(), to.rank()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::DepositPaid => "DEPOSIT_PAID",
            BookingStatus::PaidInFull => "PAID_IN_FULL",
            BookingStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// The slot being reserved: one resource on one date, over a time range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl EventWindow {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { date, start, end }
    }

    /// The widest window for a date, used when probing availability.
    pub fn whole_day(date: NaiveDate) -> Self {
        Self {
            date,
            start: NaiveTime::MIN,
            end: NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
        }
    }

    pub fn overlaps(&self, other: &EventWindow) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub resource_id: i64,
    pub window: EventWindow,
    pub event_type: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub venue_postcode: String,
    pub status: BookingStatus,
    pub total: Money,
    pub deposit: Money,
    pub travel_cost: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingRecord {
    /// Apply a status change, rejecting anything that would reverse the
    /// progression. Records are never deleted, only transitioned.
    pub fn transition(&mut self, to: BookingStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(CoreError::Conflict(format!(
                "invalid booking transition {} -> {}",
                self.status, to
            )));
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Summary pushed to the CRM collaborator.
    pub fn sync_summary(&self) -> encore_shared::events::BookingSyncSummary {
        encore_shared::events::BookingSyncSummary {
            booking_id: self.id,
            resource_id: self.resource_id,
            event_date: self.window.date,
            client_name: self.client_name.clone(),
            client_email: self.client_email.clone(),
            status: self.status.to_string(),
            total: self.total.clone(),
        }
    }

    /// The payment currently owed: deposit until it is paid, then the
    /// balance. Nothing is owed on settled or cancelled bookings.
    pub fn required_payment(&self) -> Option<(encore_core::payment::PaymentType, Money)> {
        use encore_core::payment::PaymentType;
        match self.status {
            BookingStatus::Pending | BookingStatus::Confirmed => {
                Some((PaymentType::Deposit, self.deposit.clone()))
            }
            BookingStatus::DepositPaid => {
                let balance = self.total.subtract(&self.deposit)?;
                Some((PaymentType::Balance, balance))
            }
            BookingStatus::PaidInFull | BookingStatus::Cancelled => None,
        }
    }
}
