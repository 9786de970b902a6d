//! Lazily loaded snapshot of the stop network.
//!
//! The full set of rail stations and surface stops is fetched on first use
//! and kept for a day. Concurrent callers that arrive while a load is in
//! flight wait for that load instead of starting their own. A load only
//! succeeds if both fetches succeed; failures are handed back to the caller
//! and leave nothing behind, so the next call tries again.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::{info, warn};

use crate::domain::{Coordinate, TransitStop, TravelMode};
use crate::geo::distance_meters;
use crate::interchange::{InterchangeIndex, InterchangePoint};
use crate::sources::{TransitDataError, TransitDataSource};

/// Configuration for the snapshot cache.
#[derive(Debug, Clone)]
pub struct TransitDataConfig {
    /// How long a loaded snapshot is served before reloading.
    pub ttl: Duration,
}

impl Default for TransitDataConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// One consistent view of the network.
#[derive(Debug, Clone)]
pub struct TransitSnapshot {
    rail_stations: Vec<TransitStop>,
    surface_stops: Vec<TransitStop>,
    interchanges: Vec<InterchangePoint>,
    rail_by_id: HashMap<String, usize>,
}

impl TransitSnapshot {
    /// Build a snapshot, deriving interchanges with `index`.
    pub fn new(
        rail_stations: Vec<TransitStop>,
        surface_stops: Vec<TransitStop>,
        index: &InterchangeIndex,
    ) -> Self {
        let interchanges = index.compute(&rail_stations, &surface_stops);
        let rail_by_id = rail_stations
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        Self {
            rail_stations,
            surface_stops,
            interchanges,
            rail_by_id,
        }
    }

    /// Look up a rail station by id.
    pub fn rail_station(&self, id: &str) -> Option<&TransitStop> {
        self.rail_by_id.get(id).map(|&i| &self.rail_stations[i])
    }

    pub fn rail_stations(&self) -> &[TransitStop] {
        &self.rail_stations
    }

    pub fn surface_stops(&self) -> &[TransitStop] {
        &self.surface_stops
    }

    /// Transfer points, closest walk first.
    pub fn interchanges(&self) -> &[InterchangePoint] {
        &self.interchanges
    }

    /// Stops within `max_distance_meters` of `point`, closest first.
    ///
    /// Rail stations are considered before surface stops, each in source
    /// order, and the sort is stable, so equidistant stops keep that order.
    pub fn nearest(
        &self,
        point: Coordinate,
        max_distance_meters: f64,
        max_results: usize,
        filter: Option<&dyn Fn(&TransitStop) -> bool>,
    ) -> Vec<&TransitStop> {
        let mut found: Vec<(&TransitStop, f64)> = self
            .rail_stations
            .iter()
            .chain(&self.surface_stops)
            .filter(|stop| filter.is_none_or(|f| f(*stop)))
            .map(|stop| (stop, distance_meters(point, stop.coordinate)))
            .filter(|(_, d)| *d <= max_distance_meters)
            .collect();

        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found.truncate(max_results);
        found.into_iter().map(|(stop, _)| stop).collect()
    }

    /// Nearest rail stations.
    pub fn nearest_rail(&self, point: Coordinate, max_distance_meters: f64, max_results: usize) -> Vec<&TransitStop> {
        self.nearest(point, max_distance_meters, max_results, Some(&|s: &TransitStop| s.mode == TravelMode::Rail))
    }

    /// Nearest surface stops.
    pub fn nearest_surface(&self, point: Coordinate, max_distance_meters: f64, max_results: usize) -> Vec<&TransitStop> {
        self.nearest(point, max_distance_meters, max_results, Some(&|s: &TransitStop| s.mode == TravelMode::Surface))
    }
}

/// Caches the network snapshot fetched from a [`TransitDataSource`].
pub struct TransitDataCache<S> {
    source: Arc<S>,
    index: InterchangeIndex,
    snapshot: MokaCache<(), Arc<TransitSnapshot>>,
}

impl<S: TransitDataSource> TransitDataCache<S> {
    /// Create an empty cache. Nothing is fetched until [`ensure_loaded`](Self::ensure_loaded).
    pub fn new(source: Arc<S>, index: InterchangeIndex, config: &TransitDataConfig) -> Self {
        let snapshot = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(1)
            .build();

        Self {
            source,
            index,
            snapshot,
        }
    }

    /// Return the current snapshot, loading it if needed.
    ///
    /// Callers that arrive during a load share its outcome.
    pub async fn ensure_loaded(&self) -> Result<Arc<TransitSnapshot>, Arc<TransitDataError>> {
        self.snapshot.try_get_with((), self.load()).await
    }

    async fn load(&self) -> Result<Arc<TransitSnapshot>, TransitDataError> {
        let result = tokio::try_join!(
            self.source.fetch_all_rail_stations(),
            self.source.fetch_all_surface_stops(),
        );

        let (rail, surface) = match result {
            Ok(stops) => stops,
            Err(e) => {
                warn!(error = %e, "failed to load transit data");
                return Err(e);
            }
        };

        let snapshot = TransitSnapshot::new(rail, surface, &self.index);
        info!(
            rail_stations = snapshot.rail_stations.len(),
            surface_stops = snapshot.surface_stops.len(),
            interchanges = snapshot.interchanges.len(),
            "loaded transit data"
        );
        Ok(Arc::new(snapshot))
    }

    /// True if a snapshot is currently held.
    pub async fn is_loaded(&self) -> bool {
        self.snapshot.get(&()).await.is_some()
    }

    /// Drop the snapshot; the next call reloads.
    pub async fn invalidate(&self) {
        self.snapshot.invalidate(&()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::interchange::InterchangeAllowList;
    use crate::planner::PlannerConfig;

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new_unchecked(lat, lon)
    }

    /// Source that counts fetches and can be told to fail.
    #[derive(Default)]
    struct MockSource {
        rail_calls: Mutex<usize>,
        surface_calls: Mutex<usize>,
        fail_surface: AtomicBool,
    }

    impl MockSource {
        fn rail_calls(&self) -> usize {
            *self.rail_calls.lock().unwrap()
        }

        fn surface_calls(&self) -> usize {
            *self.surface_calls.lock().unwrap()
        }
    }

    impl TransitDataSource for MockSource {
        async fn fetch_all_rail_stations(&self) -> Result<Vec<TransitStop>, TransitDataError> {
            *self.rail_calls.lock().unwrap() += 1;
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(vec![TransitStop::rail("R1", "R1", at(22.2800, 114.1600), "MTR", ["L1"])])
        }

        async fn fetch_all_surface_stops(&self) -> Result<Vec<TransitStop>, TransitDataError> {
            *self.surface_calls.lock().unwrap() += 1;
            if self.fail_surface.load(Ordering::SeqCst) {
                return Err(TransitDataError::Api {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            Ok(vec![TransitStop::surface("S1", "S1", at(22.2805, 114.1600), "KMB")])
        }
    }

    fn cache(source: Arc<MockSource>) -> TransitDataCache<MockSource> {
        let index = InterchangeIndex::new(InterchangeAllowList::new(), &PlannerConfig::default());
        TransitDataCache::new(source, index, &TransitDataConfig::default())
    }

    #[tokio::test]
    async fn loads_once_and_reuses() {
        let source = Arc::new(MockSource::default());
        let cache = cache(source.clone());

        let first = cache.ensure_loaded().await.unwrap();
        let second = cache.ensure_loaded().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.rail_calls(), 1);
        assert_eq!(first.rail_stations().len(), 1);
        assert_eq!(first.surface_stops().len(), 1);
        // Fallback scan pairs R1 with S1
        assert_eq!(first.interchanges().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_calls_share_one_load() {
        let source = Arc::new(MockSource::default());
        let cache = cache(source.clone());

        let results = futures::future::join_all((0..8).map(|_| cache.ensure_loaded())).await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(source.rail_calls(), 1);
        assert_eq!(source.surface_calls(), 1);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let source = Arc::new(MockSource::default());
        source.fail_surface.store(true, Ordering::SeqCst);
        let cache = cache(source.clone());

        let err = cache.ensure_loaded().await.unwrap_err();
        assert!(matches!(*err, TransitDataError::Api { status: 503, .. }));
        assert!(!cache.is_loaded().await);

        source.fail_surface.store(false, Ordering::SeqCst);
        let snapshot = cache.ensure_loaded().await.unwrap();
        assert_eq!(snapshot.surface_stops().len(), 1);
        assert_eq!(source.surface_calls(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let source = Arc::new(MockSource::default());
        let cache = cache(source.clone());

        cache.ensure_loaded().await.unwrap();
        cache.invalidate().await;
        cache.ensure_loaded().await.unwrap();

        assert_eq!(source.rail_calls(), 2);
    }

    fn snapshot() -> TransitSnapshot {
        let rail = vec![
            TransitStop::rail("R-far", "R-far", at(22.2850, 114.1600), "MTR", ["L1"]),
            TransitStop::rail("R-near", "R-near", at(22.2810, 114.1600), "MTR", ["L1"]),
        ];
        let surface = vec![
            TransitStop::surface("S-tie", "S-tie", at(22.2810, 114.1600), "KMB"),
            TransitStop::surface("S-out", "S-out", at(22.3000, 114.1600), "KMB"),
        ];
        let index = InterchangeIndex::new(InterchangeAllowList::new(), &PlannerConfig::default());
        TransitSnapshot::new(rail, surface, &index)
    }

    fn ids(stops: &[&TransitStop]) -> Vec<String> {
        stops.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn nearest_sorts_and_keeps_source_order_for_ties() {
        let snapshot = snapshot();
        let found = snapshot.nearest(at(22.2800, 114.1600), 1_000.0, 10, None);
        // R-near and S-tie are equidistant; rail comes first
        assert_eq!(ids(&found), vec!["R-near", "S-tie", "R-far"]);
    }

    #[test]
    fn nearest_truncates() {
        let snapshot = snapshot();
        let found = snapshot.nearest(at(22.2800, 114.1600), 1_000.0, 1, None);
        assert_eq!(ids(&found), vec!["R-near"]);
    }

    #[test]
    fn nearest_applies_filter() {
        let snapshot = snapshot();
        assert_eq!(
            ids(&snapshot.nearest_surface(at(22.2800, 114.1600), 1_000.0, 10)),
            vec!["S-tie"]
        );
        assert_eq!(
            ids(&snapshot.nearest_rail(at(22.2800, 114.1600), 1_000.0, 10)),
            vec!["R-near", "R-far"]
        );
        let only_far = |s: &TransitStop| s.id.ends_with("far");
        assert_eq!(
            ids(&snapshot.nearest(at(22.2800, 114.1600), 1_000.0, 10, Some(&only_far))),
            vec!["R-far"]
        );
    }

    #[test]
    fn rail_station_lookup() {
        let snapshot = snapshot();
        assert_eq!(snapshot.rail_station("R-far").map(|s| s.id.as_str()), Some("R-far"));
        assert!(snapshot.rail_station("S-tie").is_none());
    }

    #[test]
    fn nearest_with_nothing_in_range() {
        let snapshot = snapshot();
        assert!(snapshot.nearest(at(23.0, 115.0), 500.0, 3, None).is_empty());
    }
}
