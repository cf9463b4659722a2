use encore_booking::availability::AvailabilityChecker;
use encore_booking::orchestrator::PaymentOrchestrator;
use encore_booking::repository::BookingRepository;
use encore_booking::submission::SubmissionService;
use encore_core::sync::{SyncGateway, SyncQueue};
use encore_travel::DistanceCalculator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn BookingRepository>,
    pub checker: Arc<AvailabilityChecker>,
    pub calculator: Arc<DistanceCalculator>,
    pub submission: Arc<SubmissionService>,
    /// None when gateway credentials are missing; payment endpoints answer
    /// 503 while the rest of the flow stays up.
    pub payments: Option<Arc<PaymentOrchestrator>>,
    pub sync_queue: Arc<dyn SyncQueue>,
    pub sync_gateway: Arc<dyn SyncGateway>,
}
