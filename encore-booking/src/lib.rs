pub mod booking;
pub mod repository;
pub mod availability;
pub mod wizard;
pub mod submission;
pub mod orchestrator;

pub use booking::{BookingRecord, BookingStatus, EventWindow};
pub use repository::BookingRepository;
