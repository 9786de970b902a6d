//! Multi-modal journey planner.
//!
//! This module answers "how do I get from here to there?" for two
//! coordinates. It combines a direct walk, rail trips found by breadth-first
//! search over the station graph, surface trips between nearby stops, and
//! trips that change mode at an interchange, then ranks the results and
//! caches them for a short while.

mod cache;
mod compose;
mod config;
mod legs;
mod rank;

pub use cache::{JourneyCache, JourneyCacheConfig, JourneyCacheEntry, cache_key};
pub use compose::{CandidateError, DESTINATION_ID, JourneyPlanner, ORIGIN_ID, PlanError, TripEnd};
pub use config::PlannerConfig;
pub use legs::{LegSynthesizer, RouteCatalog};
pub use rank::{deduplicate, rank_and_dedup, rank_journeys};
