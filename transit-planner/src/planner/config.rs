//! Configuration for the journey planner.

/// Tunable thresholds for journey planning.
///
/// The defaults are the reference values; tests override individual fields
/// with struct update syntax.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Walks shorter than this are returned without multi-modal planning.
    pub short_trip_threshold_meters: f64,

    /// Walking speed (m/min).
    pub walk_speed_m_per_min: f64,

    /// Rail speed including a dwell-time allowance (m/min).
    pub rail_speed_m_per_min: f64,

    /// Bus, minibus and ferry speed (m/min).
    pub surface_speed_m_per_min: f64,

    /// How far from each end to look for rail stations.
    pub rail_search_radius_meters: f64,

    /// Rail stations considered at each end.
    pub rail_candidates: usize,

    /// How far from each end to look for surface stops.
    pub surface_search_radius_meters: f64,

    /// Surface stops considered at each end.
    pub surface_candidates: usize,

    /// Surface rides must be longer than this (exclusive).
    pub min_surface_ride_meters: f64,

    /// Surface rides must be shorter than this (exclusive).
    pub max_surface_ride_meters: f64,

    /// Interchanges tried by the mixed search.
    pub interchanges_tried: usize,

    /// Below this many curated interchanges, the proximity scan runs.
    pub min_curated_interchanges: usize,

    /// Radius for the interchange proximity scan.
    pub interchange_radius_meters: f64,

    /// Maximum number of interchanges kept.
    pub max_interchanges: usize,

    /// Journeys with equal leg counts closer than this are near-duplicates.
    pub dedup_window_minutes: u32,

    /// Maximum number of journeys returned and cached.
    pub max_results: usize,

    /// Decimal places used in journey cache keys.
    /// `None` keys on the exact coordinate values.
    pub cache_key_decimals: Option<u32>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            short_trip_threshold_meters: 600.0,
            walk_speed_m_per_min: 80.0,
            rail_speed_m_per_min: 800.0,
            surface_speed_m_per_min: 250.0,
            rail_search_radius_meters: 800.0,
            rail_candidates: 3,
            surface_search_radius_meters: 600.0,
            surface_candidates: 3,
            min_surface_ride_meters: 500.0,
            max_surface_ride_meters: 15_000.0,
            interchanges_tried: 3,
            min_curated_interchanges: 5,
            interchange_radius_meters: 300.0,
            max_interchanges: 10,
            dedup_window_minutes: 5,
            max_results: 5,
            cache_key_decimals: None,
        }
    }
}

impl PlannerConfig {
    /// True if a surface ride of this length is worth suggesting.
    pub fn surface_ride_in_range(&self, distance_meters: f64) -> bool {
        distance_meters > self.min_surface_ride_meters
            && distance_meters < self.max_surface_ride_meters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.short_trip_threshold_meters, 600.0);
        assert_eq!(config.walk_speed_m_per_min, 80.0);
        assert_eq!(config.rail_speed_m_per_min, 800.0);
        assert_eq!(config.surface_speed_m_per_min, 250.0);
        assert_eq!(config.rail_search_radius_meters, 800.0);
        assert_eq!(config.rail_candidates, 3);
        assert_eq!(config.surface_search_radius_meters, 600.0);
        assert_eq!(config.surface_candidates, 3);
        assert_eq!(config.interchanges_tried, 3);
        assert_eq!(config.min_curated_interchanges, 5);
        assert_eq!(config.interchange_radius_meters, 300.0);
        assert_eq!(config.max_interchanges, 10);
        assert_eq!(config.dedup_window_minutes, 5);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.cache_key_decimals, None);
    }

    #[test]
    fn surface_range_is_exclusive() {
        let config = PlannerConfig::default();

        assert!(!config.surface_ride_in_range(500.0));
        assert!(config.surface_ride_in_range(500.1));
        assert!(config.surface_ride_in_range(14_999.9));
        assert!(!config.surface_ride_in_range(15_000.0));
    }

    #[test]
    fn custom_config() {
        let config = PlannerConfig {
            max_results: 3,
            cache_key_decimals: Some(4),
            ..PlannerConfig::default()
        };

        assert_eq!(config.max_results, 3);
        assert_eq!(config.cache_key_decimals, Some(4));
        assert_eq!(config.rail_candidates, 3);
    }
}
