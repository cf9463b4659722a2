pub mod provider;
pub mod cache;
pub mod calculator;

pub use cache::{DistanceCache, DistanceCacheEntry};
pub use calculator::{DistanceCalculator, DistanceQuote, TravelRates};
pub use provider::{MockRoutingProvider, RoutingProvider};
