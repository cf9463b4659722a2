use crate::booking::{BookingRecord, BookingStatus, EventWindow};
use crate::repository::BookingRepository;
use chrono::{NaiveDate, NaiveTime, Utc};
use encore_core::sync::SyncQueue;
use encore_core::validation::{validate_all, BookingRequest, FieldError};
use encore_core::{CoreError, CoreResult};
use encore_shared::Money;
use encore_travel::DistanceCalculator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Pricing rules applied at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRules {
    /// Whole-percent deposit of the total, e.g. 25.
    pub deposit_percent: u32,
    /// Flat engagement fee in minor units, before travel.
    pub base_fee_pence: i64,
    pub currency: String,
    /// Where travel is priced from (the roster's home base).
    pub base_postcode: String,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            deposit_percent: 25,
            base_fee_pence: 39500,
            currency: "GBP".to_string(),
            base_postcode: "AL1 1AA".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Idempotent, conflict-checked creation of a booking record. Server-side
/// authority: the whole rule set runs again here regardless of what the
/// client wizard reported.
pub struct SubmissionService {
    repo: Arc<dyn BookingRepository>,
    calculator: Arc<DistanceCalculator>,
    sync_queue: Arc<dyn SyncQueue>,
    rules: BookingRules,
}

impl SubmissionService {
    pub fn new(
        repo: Arc<dyn BookingRepository>,
        calculator: Arc<DistanceCalculator>,
        sync_queue: Arc<dyn SyncQueue>,
        rules: BookingRules,
    ) -> Self {
        Self {
            repo,
            calculator,
            sync_queue,
            rules,
        }
    }

    pub async fn submit(
        &self,
        request: &BookingRequest,
        idempotency_token: &str,
    ) -> Result<BookingRecord, SubmissionError> {
        // 1. Token replay returns the original record, creating nothing.
        if let Some(existing) = self.repo.find_by_token(idempotency_token).await? {
            info!(
                "Idempotent replay of token {} -> booking {}",
                idempotency_token, existing.id
            );
            return Ok(existing);
        }

        // 2. Authoritative re-validation of every step.
        let errors = validate_all(request);
        if !errors.is_empty() {
            return Err(SubmissionError::Validation(errors));
        }

        let window = parse_window(request)?;
        let resource_id: i64 = request
            .get("resource_id")
            .unwrap_or_default()
            .parse()
            .map_err(|_| CoreError::Validation("resource_id is not numeric".to_string()))?;

        // 3. Price travel from the home base to the venue. Transport errors
        // surface to the caller with a retry affordance; nothing is created.
        let quote = self
            .calculator
            .compute(&self.rules.base_postcode, request.get("venue_postcode").unwrap_or_default())
            .await?;

        let base = Money::new(self.rules.base_fee_pence, &self.rules.currency);
        let total = base
            .add(&quote.travel_cost)
            .ok_or_else(|| CoreError::Internal("currency mismatch in pricing".to_string()))?;
        let deposit = total.percent(self.rules.deposit_percent);

        let record = BookingRecord {
            id: Uuid::new_v4(),
            resource_id,
            window,
            event_type: request.get("event_type").unwrap_or_default().to_string(),
            client_name: request.get("client_name").unwrap_or_default().to_string(),
            client_email: request.get("client_email").unwrap_or_default().to_string(),
            client_phone: request.get("client_phone").map(str::to_string),
            venue_postcode: quote.destination.clone(),
            status: BookingStatus::Pending,
            total,
            deposit,
            travel_cost: quote.travel_cost.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // 4. Atomic check-and-create closes the race between the Step2
        // availability probe and this submission.
        let created = self
            .repo
            .create_if_no_overlap(record, idempotency_token)
            .await?;

        // 5. CRM sync is a background concern; enqueue and move on.
        if let Err(e) = self.sync_queue.enqueue(created.id).await {
            tracing::warn!("Failed to enqueue sync for booking {}: {}", created.id, e);
        }

        info!(
            "Booking created: {} (resource {}, {}, total {})",
            created.id, created.resource_id, created.window.date, created.total
        );
        Ok(created)
    }
}

fn parse_window(request: &BookingRequest) -> CoreResult<EventWindow> {
    let date = NaiveDate::parse_from_str(request.get("event_date").unwrap_or_default(), "%Y-%m-%d")
        .map_err(|_| CoreError::Validation("event_date is not a valid date".to_string()))?;
    let start = NaiveTime::parse_from_str(request.get("start_time").unwrap_or_default(), "%H:%M")
        .map_err(|_| CoreError::Validation("start_time is not a valid time".to_string()))?;
    let end = NaiveTime::parse_from_str(request.get("end_time").unwrap_or_default(), "%H:%M")
        .map_err(|_| CoreError::Validation("end_time is not a valid time".to_string()))?;
    if start >= end {
        return Err(CoreError::Validation(
            "start_time must be before end_time".to_string(),
        ));
    }
    Ok(EventWindow::new(date, start, end))
}
