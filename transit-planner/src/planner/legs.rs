//! Construction of individual journey legs with derived metrics.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::domain::{JourneyLeg, LegKind, TransitStop};
use crate::geo::distance_meters;

use super::config::PlannerConfig;

/// Surface rides shorter than this use the short-route bucket.
const SHORT_ROUTE_MAX_METERS: f64 = 3_000.0;
/// Surface rides shorter than this (and not short) use the medium bucket.
const MEDIUM_ROUTE_MAX_METERS: f64 = 8_000.0;

/// Known surface route labels, bucketed by typical ride length.
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    short: Vec<String>,
    medium: Vec<String>,
    long: Vec<String>,
}

impl RouteCatalog {
    /// Create a catalog from three buckets.
    pub fn new(short: &[&str], medium: &[&str], long: &[&str]) -> Self {
        let owned = |routes: &[&str]| -> Vec<String> { routes.iter().map(|r| r.to_string()).collect() };
        Self {
            short: owned(short),
            medium: owned(medium),
            long: owned(long),
        }
    }

    /// Routes plausible for a ride of `distance_meters`.
    pub fn bucket(&self, distance_meters: f64) -> &[String] {
        if distance_meters < SHORT_ROUTE_MAX_METERS {
            &self.short
        } else if distance_meters < MEDIUM_ROUTE_MAX_METERS {
            &self.medium
        } else {
            &self.long
        }
    }
}

impl Default for RouteCatalog {
    fn default() -> Self {
        Self::new(
            &["1", "2", "5B", "10", "13", "15C", "18P", "23"],
            &["1A", "2A", "6", "6X", "9", "26", "35A", "70"],
            &["101", "102", "103", "104", "107", "112", "170", "182"],
        )
    }
}

/// Builds legs from two endpoints and a travel-mode speed.
#[derive(Debug, Clone)]
pub struct LegSynthesizer {
    walk_speed: f64,
    rail_speed: f64,
    surface_speed: f64,
    catalog: RouteCatalog,
}

impl LegSynthesizer {
    /// Create a synthesizer with the speeds from `config` and the default catalog.
    pub fn new(config: &PlannerConfig) -> Self {
        Self::with_catalog(config, RouteCatalog::default())
    }

    /// Create a synthesizer with a custom route catalog.
    pub fn with_catalog(config: &PlannerConfig, catalog: RouteCatalog) -> Self {
        Self {
            walk_speed: config.walk_speed_m_per_min,
            rail_speed: config.rail_speed_m_per_min,
            surface_speed: config.surface_speed_m_per_min,
            catalog,
        }
    }

    /// A walking leg.
    pub fn walk_leg(&self, from: &TransitStop, to: &TransitStop) -> JourneyLeg {
        self.leg(LegKind::Walk, from, to, self.walk_speed)
    }

    /// A rail leg between adjacent stations on `line`.
    pub fn rail_leg(&self, from: &TransitStop, to: &TransitStop, line: Option<&str>) -> JourneyLeg {
        let leg = self
            .leg(LegKind::Rail, from, to, self.rail_speed)
            .with_company(from.company.clone());
        match line {
            Some(line) => leg.with_route(line),
            None => leg,
        }
    }

    /// A surface leg on a known route.
    pub fn surface_leg(
        &self,
        from: &TransitStop,
        to: &TransitStop,
        route: &str,
        company: &str,
    ) -> JourneyLeg {
        self.leg(LegKind::Surface, from, to, self.surface_speed)
            .with_route(route)
            .with_company(company)
    }

    /// A surface leg whose route is approximated from the catalog.
    ///
    /// The route is marked advisory on the leg.
    pub fn approximate_surface_leg(&self, from: &TransitStop, to: &TransitStop) -> JourneyLeg {
        let leg = self
            .leg(LegKind::Surface, from, to, self.surface_speed)
            .with_company(from.company.clone());
        match self.approximate_surface_route(from, to) {
            Some(route) => leg.with_advisory_route(route),
            None => leg,
        }
    }

    /// Pick a plausible route label for a surface ride.
    ///
    /// This is a stand-in for a schedule lookup: the label is drawn from the
    /// distance bucket with a generator seeded from the two stop ids, so the
    /// same ride always gets the same label. It says nothing about which
    /// routes actually serve the stops.
    pub fn approximate_surface_route(&self, from: &TransitStop, to: &TransitStop) -> Option<String> {
        let distance = distance_meters(from.coordinate, to.coordinate);

        let mut rng = ChaCha8Rng::seed_from_u64(route_seed(&from.id, &to.id));

        self.catalog.bucket(distance).choose(&mut rng).cloned()
    }

    fn leg(&self, kind: LegKind, from: &TransitStop, to: &TransitStop, speed: f64) -> JourneyLeg {
        let distance = distance_meters(from.coordinate, to.coordinate);
        JourneyLeg::new(kind, from.clone(), to.clone(), distance, minutes(distance, speed))
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// FNV-1a over both ids, each terminated by 0xff (never valid UTF-8), so the
/// seed is fixed across builds and `("ab", "c")` differs from `("a", "bc")`.
fn route_seed(from: &str, to: &str) -> u64 {
    [from, to]
        .iter()
        .flat_map(|id| id.bytes().chain(std::iter::once(0xff)))
        .fold(FNV_OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME))
}

/// Whole minutes needed to cover `distance` at `speed`, rounded up.
fn minutes(distance: f64, speed: f64) -> u32 {
    (distance / speed).ceil() as u32
}
