use crate::cache::{DistanceCache, DistanceCacheEntry};
use crate::provider::RoutingProvider;
use chrono::Utc;
use encore_core::{postcode, CoreResult};
use encore_shared::Money;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Travel pricing rules: miles inside the free radius are not charged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelRates {
    pub free_miles: f64,
    pub pence_per_mile: i64,
    pub currency: String,
}

impl Default for TravelRates {
    fn default() -> Self {
        Self {
            free_miles: 20.0,
            pence_per_mile: 45,
            currency: "GBP".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistanceQuote {
    pub origin: String,
    pub destination: String,
    pub miles: f64,
    pub travel_cost: Money,
}

/// Postcode-to-postcode distance and travel-cost computation, backed by the
/// routing provider and fronted by the TTL cache.
pub struct DistanceCalculator {
    provider: Arc<dyn RoutingProvider>,
    cache: Arc<DistanceCache>,
    rates: TravelRates,
}

impl DistanceCalculator {
    pub fn new(provider: Arc<dyn RoutingProvider>, cache: Arc<DistanceCache>, rates: TravelRates) -> Self {
        Self {
            provider,
            cache,
            rates,
        }
    }

    pub fn cache(&self) -> &Arc<DistanceCache> {
        &self.cache
    }

    fn price(&self, miles: f64) -> Money {
        let chargeable = (miles - self.rates.free_miles).max(0.0);
        let pence = (chargeable * self.rates.pence_per_mile as f64).round() as i64;
        Money::new(pence, &self.rates.currency)
    }

    /// Validate both postcodes, then answer from cache or the provider.
    /// Provider failures are surfaced as retryable transport errors and
    /// never cached.
    pub async fn compute(&self, origin: &str, destination: &str) -> CoreResult<DistanceQuote> {
        let origin = postcode::parse(origin)?;
        let destination = postcode::parse(destination)?;

        if let Some(entry) = self.cache.get(&origin, &destination).await {
            debug!("Distance cache hit: {} -> {}", origin, destination);
            return Ok(DistanceQuote {
                origin,
                destination,
                miles: entry.miles,
                travel_cost: entry.travel_cost,
            });
        }

        let miles = self.provider.route_miles(&origin, &destination).await?;
        let travel_cost = self.price(miles);

        self.cache
            .put(
                &origin,
                &destination,
                DistanceCacheEntry {
                    miles,
                    travel_cost: travel_cost.clone(),
                    computed_at: Utc::now(),
                },
            )
            .await;
        info!(
            "Distance computed: {} -> {} = {:.1} miles ({})",
            origin, destination, miles, travel_cost
        );

        Ok(DistanceQuote {
            origin,
            destination,
            miles,
            travel_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockRoutingProvider;
    use encore_core::CoreError;

    fn calculator(provider: Arc<MockRoutingProvider>) -> DistanceCalculator {
        DistanceCalculator::new(
            provider,
            Arc::new(DistanceCache::new(3600)),
            TravelRates::default(),
        )
    }

    #[tokio::test]
    async fn test_invalid_postcode_rejected_before_provider() {
        let calc = calculator(Arc::new(MockRoutingProvider::new()));
        let err = calc.compute("nope", "AL1 1AA").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_free_radius_costs_nothing() {
        let provider = Arc::new(MockRoutingProvider::new());
        provider.seed("AL1 1AA", "AL3 4EH", 6.0).await;
        let calc = calculator(provider);
        let quote = calc.compute("AL1 1AA", "AL3 4EH").await.unwrap();
        assert!(quote.travel_cost.is_zero());
    }

    #[tokio::test]
    async fn test_chargeable_miles_priced_per_mile() {
        let provider = Arc::new(MockRoutingProvider::new());
        provider.seed("AL1 1AA", "B33 8TH", 30.0).await;
        let calc = calculator(provider);
        let quote = calc.compute("AL1 1AA", "B33 8TH").await.unwrap();
        // 10 chargeable miles at 45p.
        assert_eq!(quote.travel_cost, Money::new(450, "GBP"));
    }

    #[tokio::test]
    async fn test_repeat_calls_within_ttl_identical() {
        let provider = Arc::new(MockRoutingProvider::new());
        provider.seed("AL1 1AA", "B33 8TH", 30.0).await;
        let calc = calculator(provider.clone());

        let first = calc.compute("AL1 1AA", "B33 8TH").await.unwrap();
        // Change the provider's answer; the cache must still serve the first.
        provider.seed("AL1 1AA", "B33 8TH", 99.0).await;
        let second = calc.compute("al11aa", "b33 8th").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_raw_and_normalized_share_one_entry() {
        let provider = Arc::new(MockRoutingProvider::new());
        provider.seed("AL1 1AA", "B33 8TH", 30.0).await;
        let calc = calculator(provider);
        calc.compute("AL1 1AA", "B33 8TH").await.unwrap();
        calc.compute("  al1 1aa ", "b338th").await.unwrap();
        assert_eq!(calc.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_provider_failure_not_cached() {
        let provider = Arc::new(MockRoutingProvider::new());
        provider.set_offline(true).await;
        let calc = calculator(provider.clone());

        let err = calc.compute("AL1 1AA", "B33 8TH").await.unwrap_err();
        assert!(matches!(err, CoreError::Transport(_)));
        assert!(calc.cache().is_empty().await);

        // Retry succeeds once the provider is back.
        provider.set_offline(false).await;
        assert!(calc.compute("AL1 1AA", "B33 8TH").await.is_ok());
    }
}
