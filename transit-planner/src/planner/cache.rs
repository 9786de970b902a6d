//! Short-lived memoisation of planner results.
//!
//! Results are keyed on the exact origin and destination coordinates by
//! default, so only bit-identical requests share an entry. Entries expire a
//! fixed time after insertion, and expiry is checked on read.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache as MokaCache;

use crate::domain::{Coordinate, Journey};

/// Configuration for the journey cache.
#[derive(Debug, Clone)]
pub struct JourneyCacheConfig {
    /// Time to live, counted from insertion.
    pub ttl: Duration,

    /// Maximum number of cached requests.
    pub max_capacity: u64,
}

impl Default for JourneyCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            max_capacity: 10_000,
        }
    }
}

/// A cached planner result.
#[derive(Debug, Clone)]
pub struct JourneyCacheEntry {
    /// When the entry was stored (ms since the Unix epoch).
    pub timestamp_ms: i64,
    pub journeys: Arc<Vec<Journey>>,
}

/// Build the cache key for a request.
///
/// With `decimals = None` each coordinate is written in its shortest
/// round-trip decimal form. `Some(n)` rounds to `n` places first, so nearby
/// requests share a key.
pub fn cache_key(origin: Coordinate, destination: Coordinate, decimals: Option<u32>) -> String {
    // -0.0 and 0.0 compare equal and must share a key
    let fmt = |v: f64| {
        let v = v + 0.0;
        match decimals {
            Some(n) => format!("{:.*}", n as usize, v),
            None => v.to_string(),
        }
    };
    format!(
        "{},{}->{},{}",
        fmt(origin.latitude),
        fmt(origin.longitude),
        fmt(destination.latitude),
        fmt(destination.longitude)
    )
}

/// TTL cache of planner results.
pub struct JourneyCache {
    entries: MokaCache<String, JourneyCacheEntry>,
}

impl JourneyCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &JourneyCacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { entries }
    }

    /// Get a live entry.
    pub async fn get(&self, key: &str) -> Option<JourneyCacheEntry> {
        self.entries.get(key).await
    }

    /// Store journeys under `key`, stamped with the current time.
    pub async fn put(&self, key: String, journeys: Arc<Vec<Journey>>) {
        let entry = JourneyCacheEntry {
            timestamp_ms: Utc::now().timestamp_millis(),
            journeys,
        };
        self.entries.insert(key, entry).await;
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Number of entries, after applying pending writes and expiries.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JourneyLeg, LegKind, TransitStop};

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new_unchecked(lat, lon)
    }

    fn journeys() -> Arc<Vec<Journey>> {
        let leg = JourneyLeg::new(
            LegKind::Walk,
            TransitStop::waypoint("origin", at(22.28, 114.15)),
            TransitStop::waypoint("destination", at(22.281, 114.15)),
            111.0,
            2,
        );
        Arc::new(vec![Journey::new(vec![leg]).unwrap()])
    }

    #[test]
    fn exact_keys_distinguish_tiny_differences() {
        let a = cache_key(at(22.2819, 114.1581), at(22.3193, 114.1694), None);
        let b = cache_key(at(22.28190001, 114.1581), at(22.3193, 114.1694), None);
        assert_ne!(a, b);
        assert_eq!(a, "22.2819,114.1581->22.3193,114.1694");
    }

    #[test]
    fn rounded_keys_snap_nearby_requests() {
        let a = cache_key(at(22.28191, 114.1581), at(22.3193, 114.1694), Some(3));
        let b = cache_key(at(22.28188, 114.1581), at(22.3193, 114.1694), Some(3));
        assert_eq!(a, b);
        assert_eq!(a, "22.282,114.158->22.319,114.169");
    }

    #[test]
    fn direction_matters() {
        let there = cache_key(at(22.0, 114.0), at(22.5, 114.5), None);
        let back = cache_key(at(22.5, 114.5), at(22.0, 114.0), None);
        assert_ne!(there, back);
    }

    #[test]
    fn signed_zero_shares_a_key() {
        let destination = at(22.3, 114.1);
        let positive = cache_key(at(0.0, 114.0), destination, None);
        let negative = cache_key(at(-0.0, 114.0), destination, None);
        assert_eq!(positive, negative);
        assert_eq!(positive, "0,114->22.3,114.1");

        let rounded = cache_key(at(-0.0, -0.0), destination, Some(2));
        assert_eq!(rounded, "0.00,0.00->22.30,114.10");
    }

    #[tokio::test]
    async fn put_then_get() {
        let cache = JourneyCache::new(&JourneyCacheConfig::default());
        let stored = journeys();

        let before = Utc::now().timestamp_millis();
        cache.put("k".into(), stored.clone()).await;

        let entry = cache.get("k").await.unwrap();
        assert!(Arc::ptr_eq(&entry.journeys, &stored));
        assert!(entry.timestamp_ms >= before);
        assert!(cache.get("other").await.is_none());
    }

    #[tokio::test]
    async fn entries_expire() {
        let config = JourneyCacheConfig {
            ttl: Duration::from_millis(50),
            ..JourneyCacheConfig::default()
        };
        let cache = JourneyCache::new(&config);
        cache.put("k".into(), journeys()).await;
        assert!(cache.get("k").await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let cache = JourneyCache::new(&JourneyCacheConfig::default());
        cache.put("a".into(), journeys()).await;
        cache.put("b".into(), journeys()).await;
        cache.put("b".into(), journeys()).await;
        assert_eq!(cache.entry_count().await, 2);

        cache.clear();

        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_none());
    }
}
