pub mod app_config;
pub mod booking_repo;
pub mod sync_queue;
pub mod sync_gateway;

pub use booking_repo::MemoryBookingRepository;
pub use sync_gateway::MockCrmGateway;
pub use sync_queue::MemorySyncQueue;
