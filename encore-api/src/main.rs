use encore_api::{app, worker, AppState};
use encore_booking::availability::AvailabilityChecker;
use encore_booking::orchestrator::{MockPaymentGateway, PaymentOrchestrator};
use encore_booking::submission::{BookingRules, SubmissionService};
use encore_store::{MemoryBookingRepository, MemorySyncQueue, MockCrmGateway};
use encore_travel::{DistanceCache, DistanceCalculator, MockRoutingProvider, TravelRates};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = encore_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Encore API on port {}", config.server.port);

    let repo = Arc::new(MemoryBookingRepository::new());
    let sync_queue = Arc::new(MemorySyncQueue::new());
    let sync_gateway = Arc::new(MockCrmGateway::new());

    let calculator = Arc::new(DistanceCalculator::new(
        Arc::new(MockRoutingProvider::new()),
        Arc::new(DistanceCache::new(config.travel.cache_ttl_seconds)),
        TravelRates {
            free_miles: config.travel.free_miles,
            pence_per_mile: config.travel.pence_per_mile,
            currency: config.business_rules.currency.clone(),
        },
    ));

    let submission = Arc::new(SubmissionService::new(
        repo.clone(),
        calculator.clone(),
        sync_queue.clone(),
        BookingRules {
            deposit_percent: config.business_rules.deposit_percent,
            base_fee_pence: config.business_rules.base_fee_pence,
            currency: config.business_rules.currency.clone(),
            base_postcode: config.business_rules.base_postcode.clone(),
        },
    ));

    // Without gateway credentials the payment feature is disabled; the rest
    // of the booking flow keeps working.
    let payments = match &config.payment {
        Some(payment) => {
            tracing::info!("Payment gateway configured (key {}...)", &payment.secret_key[..4.min(payment.secret_key.len())]);
            Some(Arc::new(PaymentOrchestrator::new(
                Arc::new(MockPaymentGateway),
                repo.clone(),
                sync_queue.clone(),
            )))
        }
        None => {
            tracing::warn!("No payment gateway credentials; payment endpoints disabled");
            None
        }
    };

    tokio::spawn(worker::start_sync_worker(
        repo.clone(),
        sync_queue.clone(),
        sync_gateway.clone(),
        config.sync.interval_seconds,
        config.sync.max_attempts,
    ));

    let app_state = AppState {
        repo: repo.clone(),
        checker: Arc::new(AvailabilityChecker::new(repo)),
        calculator,
        submission,
        payments,
        sync_queue,
        sync_gateway,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
