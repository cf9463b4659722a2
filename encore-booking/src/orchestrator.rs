use crate::booking::{BookingRecord, BookingStatus};
use crate::repository::BookingRepository;
use encore_core::payment::{
    GatewayIntent, GatewayResult, IntentStatus, PaymentGateway, PaymentIntent, PaymentType,
};
use encore_core::sync::SyncQueue;
use encore_core::{CoreError, CoreResult};
use encore_shared::Money;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

/// Drives the payment-intent lifecycle for bookings:
/// NoPayment -> IntentCreated -> Confirming -> Captured | Failed.
/// Transitions for one booking are serialized; different bookings proceed
/// in parallel.
pub struct PaymentOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
    repo: Arc<dyn BookingRepository>,
    sync_queue: Arc<dyn SyncQueue>,
    intents: RwLock<HashMap<String, PaymentIntent>>,
    booking_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl PaymentOrchestrator {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        repo: Arc<dyn BookingRepository>,
        sync_queue: Arc<dyn SyncQueue>,
    ) -> Self {
        Self {
            gateway,
            repo,
            sync_queue,
            intents: RwLock::new(HashMap::new()),
            booking_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, booking_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.booking_locks.lock().await;
        locks
            .entry(booking_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load_booking(&self, booking_id: Uuid) -> CoreResult<BookingRecord> {
        self.repo
            .get(booking_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("booking {booking_id}")))
    }

    pub async fn get_intent(&self, intent_id: &str) -> Option<PaymentIntent> {
        self.intents.read().await.get(intent_id).cloned()
    }

    /// Create a fresh intent for the booking's currently required payment.
    /// An amount or type that does not match what the record requires is
    /// rejected, never silently adjusted.
    pub async fn create_intent(
        &self,
        booking_id: Uuid,
        payment_type: PaymentType,
        amount: Money,
    ) -> CoreResult<PaymentIntent> {
        let lock = self.lock_for(booking_id).await;
        let _guard = lock.lock().await;

        let booking = self.load_booking(booking_id).await?;
        let (required_type, required_amount) = booking.required_payment().ok_or_else(|| {
            CoreError::Payment(format!(
                "booking {} has no outstanding payment (status {})",
                booking_id, booking.status
            ))
        })?;

        if payment_type != required_type || amount != required_amount {
            return Err(CoreError::Payment(format!(
                "amount mismatch: booking requires {} ({:?}), got {} ({:?})",
                required_amount, required_type, amount, payment_type
            )));
        }

        let GatewayIntent {
            intent_id,
            client_secret,
        } = self
            .gateway
            .create_intent(
                booking_id,
                &amount,
                serde_json::json!({ "payment_type": payment_type }),
            )
            .await?;

        let intent = PaymentIntent {
            id: intent_id,
            booking_id,
            amount,
            payment_type,
            status: IntentStatus::Created,
            client_secret: Some(client_secret),
            created_at: chrono::Utc::now(),
        };
        self.intents
            .write()
            .await
            .insert(intent.id.clone(), intent.clone());
        info!(
            "Payment intent {} created for booking {} ({})",
            intent.id, booking_id, intent.amount
        );
        Ok(intent)
    }

    /// Confirm a capture attempt reported by the gateway's client-side
    /// confirmation step. A failed intent is terminal: retry goes through
    /// `create_intent` again and supersedes it.
    pub async fn confirm(
        &self,
        intent_id: &str,
        result: GatewayResult,
    ) -> CoreResult<BookingRecord> {
        let booking_id = self
            .get_intent(intent_id)
            .await
            .ok_or_else(|| CoreError::NotFound(format!("payment intent {intent_id}")))?
            .booking_id;

        let lock = self.lock_for(booking_id).await;
        let _guard = lock.lock().await;

        // Re-read under the lock: a racing confirmation may have settled it.
        let intent = self
            .get_intent(intent_id)
            .await
            .ok_or_else(|| CoreError::NotFound(format!("payment intent {intent_id}")))?;
        if intent.status != IntentStatus::Created {
            return Err(CoreError::Payment(format!(
                "intent {} is {:?} and cannot be captured",
                intent_id, intent.status
            )));
        }

        let booking = self.load_booking(booking_id).await?;

        // The required amount may have moved since creation; a stale intent
        // is invalidated rather than captured for the wrong amount.
        let still_required = booking
            .required_payment()
            .map(|(t, a)| t == intent.payment_type && a == intent.amount)
            .unwrap_or(false);
        if !still_required {
            self.set_intent_status(intent_id, IntentStatus::Failed).await;
            return Err(CoreError::Payment(format!(
                "intent {} no longer matches the required payment and was invalidated",
                intent_id
            )));
        }

        self.set_intent_status(intent_id, IntentStatus::Confirming)
            .await;

        if result == GatewayResult::Declined {
            self.set_intent_status(intent_id, IntentStatus::Failed).await;
            warn!(
                "Payment declined for booking {} (intent {})",
                booking_id, intent_id
            );
            // The booking stays in its prior payment status.
            return Err(CoreError::Payment("payment was declined".to_string()));
        }

        // A capture error from the provider (not a decline) also ends this
        // intent; retry goes through a fresh one.
        if let Err(e) = self.gateway.capture(intent_id, &result).await {
            self.set_intent_status(intent_id, IntentStatus::Failed).await;
            warn!(
                "Payment capture failed for booking {} (intent {}): {}",
                booking_id, intent_id, e
            );
            return Err(e);
        }
        self.set_intent_status(intent_id, IntentStatus::Captured)
            .await;

        let next_status = match intent.payment_type {
            PaymentType::Balance => BookingStatus::PaidInFull,
            PaymentType::Deposit if intent.amount == booking.total => BookingStatus::PaidInFull,
            PaymentType::Deposit => BookingStatus::DepositPaid,
        };
        let updated = self.repo.update_status(booking_id, next_status).await?;

        if let Err(e) = self.sync_queue.enqueue(booking_id).await {
            warn!("Failed to enqueue sync for booking {}: {}", booking_id, e);
        }

        info!(
            "Payment captured for booking {}: {} -> {}",
            booking_id, intent.amount, updated.status
        );
        Ok(updated)
    }

    async fn set_intent_status(&self, intent_id: &str, status: IntentStatus) {
        if let Some(intent) = self.intents.write().await.get_mut(intent_id) {
            intent.status = status;
        }
    }
}

/// In-process gateway standing in for the card provider. Intents always
/// succeed at creation; the capture outcome follows the client-reported
/// result, matching the provider contract.
pub struct MockPaymentGateway;

#[async_trait::async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_intent(
        &self,
        booking_id: Uuid,
        _amount: &Money,
        _metadata: serde_json::Value,
    ) -> CoreResult<GatewayIntent> {
        let suffix = Uuid::new_v4().simple().to_string();
        Ok(GatewayIntent {
            intent_id: format!("pi_{}_{}", booking_id.simple(), &suffix[..8]),
            client_secret: format!("cs_{}", suffix),
        })
    }

    async fn capture(&self, _intent_id: &str, result: &GatewayResult) -> CoreResult<()> {
        match result {
            GatewayResult::Succeeded => Ok(()),
            GatewayResult::Declined => Err(CoreError::Payment("card declined".to_string())),
        }
    }
}
