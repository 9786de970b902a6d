//! Transfer points between the rail and surface networks.
//!
//! Some rail stations sit next to bus termini or ferry piers, making them
//! natural places to change mode. A curated allow-list names the known
//! pairs; when it yields too few usable pairs for the loaded data, a
//! proximity scan adds the closest surface stop to each rail station.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::TransitStop;
use crate::geo::distance_meters;
use crate::planner::PlannerConfig;

/// A rail station and a surface stop close enough to walk between.
#[derive(Debug, Clone, PartialEq)]
pub struct InterchangePoint {
    pub rail_station: TransitStop,
    pub surface_stop: TransitStop,
    pub walk_distance_meters: f64,
}

/// Curated rail station → surface stop pairs, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InterchangeAllowList {
    entries: Vec<(String, Vec<String>)>,
}

impl InterchangeAllowList {
    /// Create an empty allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow a transfer between a rail station and a surface stop.
    pub fn add(&mut self, rail_station: &str, surface_stop: &str) {
        let idx = match self.entries.iter().position(|(id, _)| id == rail_station) {
            Some(idx) => idx,
            None => {
                self.entries.push((rail_station.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        let stops = &mut self.entries[idx].1;
        if !stops.iter().any(|s| s == surface_stop) {
            stops.push(surface_stop.to_string());
        }
    }

    /// Iterate over allowed (rail station, surface stop) pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(rail, stops)| {
            stops
                .iter()
                .map(move |stop| (rail.as_str(), stop.as_str()))
        })
    }

    /// Number of allowed pairs.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, stops)| stops.len()).sum()
    }

    /// Returns true if no pairs are allowed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builder for creating allow-lists.
#[derive(Debug, Default)]
pub struct InterchangeAllowListBuilder {
    inner: InterchangeAllowList,
}

impl InterchangeAllowListBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow transfers from a rail station to each of the given surface stops.
    pub fn add(mut self, rail_station: &str, surface_stops: &[&str]) -> Self {
        for stop in surface_stops {
            self.inner.add(rail_station, stop);
        }
        self
    }

    /// Build the allow-list.
    pub fn build(self) -> InterchangeAllowList {
        self.inner
    }
}

/// Curated interchanges for the bundled network.
///
/// Each pair is a station exit within a few minutes' walk of a bus
/// terminus, minibus stand or ferry pier.
pub fn default_allow_list() -> InterchangeAllowList {
    InterchangeAllowListBuilder::new()
        .add("CEN", &["CTB-001", "SF-301"]) // Exchange Square, Star Ferry
        .add("ADM", &["CTB-003"]) // Admiralty bus station
        .add("WAC", &["CTB-004"])
        .add("TST", &["KMB-101", "SF-302"]) // Star Ferry bus terminus and pier
        .add("MOK", &["KMB-104", "GMB-201"])
        .build()
}

/// Derives transfer points from the allow-list and the loaded stops.
#[derive(Debug, Clone)]
pub struct InterchangeIndex {
    allow_list: InterchangeAllowList,
    min_curated: usize,
    fallback_radius_meters: f64,
    max_results: usize,
}

impl InterchangeIndex {
    /// Create an index using the limits from `config`.
    pub fn new(allow_list: InterchangeAllowList, config: &PlannerConfig) -> Self {
        Self {
            allow_list,
            min_curated: config.min_curated_interchanges,
            fallback_radius_meters: config.interchange_radius_meters,
            max_results: config.max_interchanges,
        }
    }

    /// Compute transfer points for a snapshot of stops.
    ///
    /// Curated pairs come first; if fewer than the minimum exist in the
    /// data, each rail station contributes its nearest surface stop within
    /// the fallback radius. The result is sorted by walking distance
    /// (stable) and capped.
    pub fn compute(
        &self,
        rail_stations: &[TransitStop],
        surface_stops: &[TransitStop],
    ) -> Vec<InterchangePoint> {
        let rail_by_id: HashMap<&str, &TransitStop> =
            rail_stations.iter().map(|s| (s.id.as_str(), s)).collect();
        let surface_by_id: HashMap<&str, &TransitStop> =
            surface_stops.iter().map(|s| (s.id.as_str(), s)).collect();

        let mut points = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for (rail_id, stop_id) in self.allow_list.pairs() {
            let (Some(rail), Some(stop)) = (rail_by_id.get(rail_id), surface_by_id.get(stop_id))
            else {
                continue;
            };
            seen.insert((rail_id.to_string(), stop_id.to_string()));
            points.push(point(rail, stop));
        }
        let curated = points.len();

        if curated < self.min_curated {
            for rail in rail_stations {
                let nearest = surface_stops
                    .iter()
                    .map(|stop| (stop, distance_meters(rail.coordinate, stop.coordinate)))
                    .filter(|(_, d)| *d <= self.fallback_radius_meters)
                    .min_by(|a, b| a.1.total_cmp(&b.1));

                if let Some((stop, _)) = nearest
                    && seen.insert((rail.id.clone(), stop.id.clone()))
                {
                    points.push(point(rail, stop));
                }
            }
        }

        points.sort_by(|a, b| a.walk_distance_meters.total_cmp(&b.walk_distance_meters));
        points.truncate(self.max_results);

        debug!(
            curated,
            total = points.len(),
            "computed interchanges"
        );

        points
    }
}

fn point(rail: &TransitStop, stop: &TransitStop) -> InterchangePoint {
    InterchangePoint {
        rail_station: rail.clone(),
        surface_stop: stop.clone(),
        walk_distance_meters: distance_meters(rail.coordinate, stop.coordinate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new_unchecked(lat, lon)
    }

    fn rail(id: &str, lat: f64, lon: f64) -> TransitStop {
        TransitStop::rail(id, id, at(lat, lon), "MTR", ["L1"])
    }

    fn surface(id: &str, lat: f64, lon: f64) -> TransitStop {
        TransitStop::surface(id, id, at(lat, lon), "KMB")
    }

    fn config(min_curated: usize, max: usize) -> PlannerConfig {
        PlannerConfig {
            min_curated_interchanges: min_curated,
            max_interchanges: max,
            ..PlannerConfig::default()
        }
    }

    #[test]
    fn allow_list_deduplicates() {
        let mut list = InterchangeAllowList::new();
        list.add("R1", "S1");
        list.add("R1", "S1");
        list.add("R1", "S2");
        list.add("R2", "S1");
        assert_eq!(list.len(), 3);
        let pairs: Vec<_> = list.pairs().collect();
        assert_eq!(pairs, vec![("R1", "S1"), ("R1", "S2"), ("R2", "S1")]);
    }

    #[test]
    fn curated_pairs_require_both_stops() {
        let list = InterchangeAllowListBuilder::new()
            .add("R1", &["S1", "MISSING"])
            .add("GONE", &["S1"])
            .build();
        let index = InterchangeIndex::new(list, &config(0, 10));

        let rails = [rail("R1", 22.2800, 114.1600)];
        let stops = [surface("S1", 22.2810, 114.1600)];
        let points = index.compute(&rails, &stops);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].rail_station.id, "R1");
        assert_eq!(points[0].surface_stop.id, "S1");
        assert!((points[0].walk_distance_meters - 111.2).abs() < 1.0);
    }

    #[test]
    fn fallback_scan_adds_nearest_within_radius() {
        let index = InterchangeIndex::new(InterchangeAllowList::new(), &config(5, 10));

        let rails = [
            rail("R1", 22.2800, 114.1600),
            rail("R2", 22.3000, 114.1600),
            rail("R3", 22.3500, 114.1600),
        ];
        let stops = [
            surface("S-far", 22.2820, 114.1600),  // ~222 m from R1
            surface("S-near", 22.2805, 114.1600), // ~56 m from R1
            surface("S2", 22.3010, 114.1600),     // ~111 m from R2
            surface("S3", 22.3600, 114.1600),     // ~1.1 km from R3
        ];
        let points = index.compute(&rails, &stops);

        let pairs: Vec<(&str, &str)> = points
            .iter()
            .map(|p| (p.rail_station.id.as_str(), p.surface_stop.id.as_str()))
            .collect();
        assert_eq!(pairs, vec![("R1", "S-near"), ("R2", "S2")]);
    }

    #[test]
    fn fallback_skipped_when_enough_curated() {
        let list = InterchangeAllowListBuilder::new().add("R1", &["S1"]).build();
        let index = InterchangeIndex::new(list, &config(1, 10));

        let rails = [rail("R1", 22.2800, 114.1600), rail("R2", 22.3000, 114.1600)];
        let stops = [surface("S1", 22.2810, 114.1600), surface("S2", 22.3001, 114.1600)];
        let points = index.compute(&rails, &stops);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].surface_stop.id, "S1");
    }

    #[test]
    fn fallback_does_not_duplicate_curated() {
        let list = InterchangeAllowListBuilder::new().add("R1", &["S1"]).build();
        let index = InterchangeIndex::new(list, &config(5, 10));

        let rails = [rail("R1", 22.2800, 114.1600)];
        let stops = [surface("S1", 22.2801, 114.1600)];
        assert_eq!(index.compute(&rails, &stops).len(), 1);
    }

    #[test]
    fn sorted_and_capped() {
        let index = InterchangeIndex::new(InterchangeAllowList::new(), &config(5, 2));

        let rails = [
            rail("R1", 22.2800, 114.1600),
            rail("R2", 22.3000, 114.1600),
            rail("R3", 22.3200, 114.1600),
        ];
        let stops = [
            surface("S1", 22.2820, 114.1600), // ~222 m
            surface("S2", 22.3005, 114.1600), // ~56 m
            surface("S3", 22.3210, 114.1600), // ~111 m
        ];
        let points = index.compute(&rails, &stops);

        let ids: Vec<&str> = points.iter().map(|p| p.rail_station.id.as_str()).collect();
        assert_eq!(ids, vec!["R2", "R3"]);
    }

    #[test]
    fn default_list_has_pairs() {
        let list = default_allow_list();
        assert!(!list.is_empty());
        assert!(list.pairs().any(|(r, s)| r == "CEN" && s == "CTB-001"));
    }
}
