use chrono::{DateTime, Duration, Utc};
use encore_shared::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

/// Cached distance computation for one normalized postcode pair. Immutable
/// once written within its TTL; recomputation overwrites unconditionally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistanceCacheEntry {
    pub miles: f64,
    pub travel_cost: Money,
    pub computed_at: DateTime<Utc>,
}

/// Distance cache keyed by normalized (origin, destination). Concurrent
/// reads are unlimited; writes are idempotent overwrites of equivalent data,
/// so racing writers are harmless.
pub struct DistanceCache {
    entries: RwLock<HashMap<(String, String), DistanceCacheEntry>>,
    ttl: Duration,
}

impl DistanceCache {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Fresh entry for the pair, or None on miss/expiry. Callers pass
    /// already-normalized postcodes; raw input must never reach the key.
    pub async fn get(&self, origin: &str, destination: &str) -> Option<DistanceCacheEntry> {
        let entries = self.entries.read().await;
        let entry = entries.get(&(origin.to_string(), destination.to_string()))?;
        if Utc::now() - entry.computed_at > self.ttl {
            return None;
        }
        Some(entry.clone())
    }

    pub async fn put(&self, origin: &str, destination: &str, entry: DistanceCacheEntry) {
        self.entries
            .write()
            .await
            .insert((origin.to_string(), destination.to_string()), entry);
    }

    /// Administrative clear: removes all entries unconditionally.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        info!("Distance cache cleared ({} entries removed)", removed);
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(miles: f64) -> DistanceCacheEntry {
        DistanceCacheEntry {
            miles,
            travel_cost: Money::new(450, "GBP"),
            computed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache = DistanceCache::new(3600);
        cache.put("AL1 1AA", "SW1A 1AA", entry(22.0)).await;
        let hit = cache.get("AL1 1AA", "SW1A 1AA").await.unwrap();
        assert_eq!(hit.miles, 22.0);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = DistanceCache::new(60);
        let stale = DistanceCacheEntry {
            computed_at: Utc::now() - Duration::seconds(120),
            ..entry(22.0)
        };
        cache.put("AL1 1AA", "SW1A 1AA", stale).await;
        assert!(cache.get("AL1 1AA", "SW1A 1AA").await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_unconditionally() {
        let cache = DistanceCache::new(3600);
        cache.put("AL1 1AA", "SW1A 1AA", entry(22.0)).await;
        cache.put("AL1 1AA", "SW1A 1AA", entry(30.0)).await;
        assert_eq!(cache.get("AL1 1AA", "SW1A 1AA").await.unwrap().miles, 30.0);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let cache = DistanceCache::new(3600);
        cache.put("AL1 1AA", "SW1A 1AA", entry(22.0)).await;
        cache.put("AL1 1AA", "B33 8TH", entry(80.0)).await;
        assert_eq!(cache.clear().await, 2);
        assert!(cache.is_empty().await);
    }
}
