//! Journey composition.
//!
//! Combines the stop snapshot, the rail graph and the interchange list into
//! whole itineraries: a direct walk, rail-only and surface-only trips, and
//! trips that change between the two networks at an interchange.
//!
//! Every search phase builds each candidate as a `Result`. A candidate that
//! fails is logged and skipped, so one bad pairing never hides the others.
//! The only error that reaches the caller is invalid input; if the network
//! data cannot be loaded the caller still gets the direct walk.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    Coordinate, DomainError, InvalidCoordinate, Journey, JourneyLeg, TransitStop, TravelMode,
};
use crate::geo::distance_meters;
use crate::graph::StationGraph;
use crate::interchange::{InterchangeAllowList, InterchangeIndex, InterchangePoint};
use crate::sources::TransitDataSource;
use crate::transit_data::{TransitDataCache, TransitDataConfig, TransitSnapshot};

use super::cache::{JourneyCache, JourneyCacheConfig, cache_key};
use super::config::PlannerConfig;
use super::legs::LegSynthesizer;
use super::rank::rank_and_dedup;

/// Waypoint id for the requested origin.
pub const ORIGIN_ID: &str = "origin";
/// Waypoint id for the requested destination.
pub const DESTINATION_ID: &str = "destination";

/// Error from journey planning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidCoordinate),
}

/// Which end of the trip a candidate was looking near.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripEnd {
    Origin,
    Destination,
}

impl fmt::Display for TripEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripEnd::Origin => write!(f, "origin"),
            TripEnd::Destination => write!(f, "destination"),
        }
    }
}

/// Why a single candidate journey could not be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CandidateError {
    #[error("no {mode} stop near the {end}")]
    NoStopNearby { mode: TravelMode, end: TripEnd },

    #[error("no rail path from {from} to {to}")]
    NoRailPath { from: String, to: String },

    #[error("rail station {0} is on the graph but not in the loaded data")]
    UnknownStation(String),

    #[error("{mode} ride would board and alight at {stop}")]
    DegenerateRide { mode: TravelMode, stop: String },

    #[error("journey rejected: {0}")]
    Rejected(#[from] DomainError),
}

/// Plans multi-modal journeys between two coordinates.
pub struct JourneyPlanner<S> {
    data: TransitDataCache<S>,
    graph: Arc<StationGraph>,
    legs: LegSynthesizer,
    journeys: JourneyCache,
    config: PlannerConfig,
}

impl<S: TransitDataSource> JourneyPlanner<S> {
    /// Create a planner.
    ///
    /// Nothing is fetched from `source` until the first request.
    pub fn new(
        source: Arc<S>,
        graph: Arc<StationGraph>,
        allow_list: InterchangeAllowList,
        config: PlannerConfig,
        data_config: &TransitDataConfig,
        cache_config: &JourneyCacheConfig,
    ) -> Self {
        let index = InterchangeIndex::new(allow_list, &config);
        Self {
            data: TransitDataCache::new(source, index, data_config),
            graph,
            legs: LegSynthesizer::new(&config),
            journeys: JourneyCache::new(cache_config),
            config,
        }
    }

    /// Plan journeys from `origin` to `destination`, best first.
    ///
    /// Always returns at least the direct walk for valid input.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidInput`] if either coordinate is out of
    /// range or not finite.
    pub async fn plan_journey(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Journey>, PlanError> {
        let origin = origin.validate()?;
        let destination = destination.validate()?;

        let key = cache_key(origin, destination, self.config.cache_key_decimals);
        if let Some(entry) = self.journeys.get(&key).await {
            debug!(%key, cached_at = entry.timestamp_ms, "journey cache hit");
            return Ok(entry.journeys.as_ref().clone());
        }

        let from = TransitStop::waypoint(ORIGIN_ID, origin);
        let to = TransitStop::waypoint(DESTINATION_ID, destination);

        let snapshot = match self.data.ensure_loaded().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "transit data unavailable, returning direct walk only");
                return Ok(vec![self.direct_walk(&from, &to)]);
            }
        };

        let walk = self.direct_walk(&from, &to);
        if walk.total_distance_meters() < self.config.short_trip_threshold_meters {
            debug!(
                distance = walk.total_distance_meters(),
                "short trip, skipping transit search"
            );
            return Ok(vec![walk]);
        }

        let rail = self.rail_journeys(&snapshot, &from, &to);
        let surface = self.surface_journeys(&snapshot, &from, &to);
        let mixed = self.mixed_journeys(&snapshot, &from, &to);
        debug!(
            rail = rail.len(),
            surface = surface.len(),
            mixed = mixed.len(),
            "candidate journeys built"
        );

        let mut all = Vec::with_capacity(1 + rail.len() + surface.len() + mixed.len());
        all.push(walk);
        all.extend(rail);
        all.extend(surface);
        all.extend(mixed);

        let ranked = rank_and_dedup(all, self.config.dedup_window_minutes, self.config.max_results);
        self.journeys.put(key, Arc::new(ranked.clone())).await;

        Ok(ranked)
    }

    /// Drop every cached planner result.
    pub fn clear_journey_cache(&self) {
        self.journeys.clear();
    }

    /// Drop the loaded network data; the next request reloads it.
    pub async fn invalidate_transit_data(&self) {
        self.data.invalidate().await;
    }

    fn direct_walk(&self, from: &TransitStop, to: &TransitStop) -> Journey {
        Journey::single(self.legs.walk_leg(from, to))
    }

    /// Walk to a nearby station, ride, walk from a station near the end.
    fn rail_journeys(
        &self,
        snapshot: &TransitSnapshot,
        from: &TransitStop,
        to: &TransitStop,
    ) -> Vec<Journey> {
        let starts = self.nearest_rail(snapshot, from.coordinate);
        let ends = self.nearest_rail(snapshot, to.coordinate);

        let mut journeys = Vec::new();
        for start in &starts {
            for end in &ends {
                if start.id == end.id {
                    continue;
                }
                match self.rail_candidate(snapshot, from, start, end, to) {
                    Ok(journey) => journeys.push(journey),
                    Err(e) => debug!(start = %start.id, end = %end.id, error = %e, "skipping rail candidate"),
                }
            }
        }
        journeys
    }

    fn rail_candidate(
        &self,
        snapshot: &TransitSnapshot,
        from: &TransitStop,
        board: &TransitStop,
        alight: &TransitStop,
        to: &TransitStop,
    ) -> Result<Journey, CandidateError> {
        let mut legs = vec![self.legs.walk_leg(from, board)];
        legs.extend(self.rail_ride(snapshot, board, alight)?);
        legs.push(self.legs.walk_leg(alight, to));
        Ok(Journey::new(legs)?)
    }

    /// Walk to a nearby stop, ride, walk from a stop near the end.
    fn surface_journeys(
        &self,
        snapshot: &TransitSnapshot,
        from: &TransitStop,
        to: &TransitStop,
    ) -> Vec<Journey> {
        let starts = self.nearest_surface(snapshot, from.coordinate);
        let ends = self.nearest_surface(snapshot, to.coordinate);

        let mut journeys = Vec::new();
        for start in &starts {
            for end in &ends {
                let ride = distance_meters(start.coordinate, end.coordinate);
                if !self.config.surface_ride_in_range(ride) {
                    continue;
                }
                let legs = vec![
                    self.legs.walk_leg(from, start),
                    self.legs.approximate_surface_leg(start, end),
                    self.legs.walk_leg(end, to),
                ];
                match Journey::new(legs) {
                    Ok(journey) => journeys.push(journey),
                    Err(e) => debug!(start = %start.id, end = %end.id, error = %e, "skipping surface candidate"),
                }
            }
        }
        journeys
    }

    /// Journeys that change between rail and surface at an interchange.
    fn mixed_journeys(
        &self,
        snapshot: &TransitSnapshot,
        from: &TransitStop,
        to: &TransitStop,
    ) -> Vec<Journey> {
        let mut journeys = Vec::new();
        for interchange in snapshot.interchanges().iter().take(self.config.interchanges_tried) {
            let candidates = [
                ("rail first", self.rail_then_surface(snapshot, from, interchange, to)),
                ("surface first", self.surface_then_rail(snapshot, from, interchange, to)),
            ];
            for (pattern, candidate) in candidates {
                match candidate {
                    Ok(journey) => journeys.push(journey),
                    Err(e) => debug!(
                        pattern,
                        rail = %interchange.rail_station.id,
                        surface = %interchange.surface_stop.id,
                        error = %e,
                        "skipping mixed candidate"
                    ),
                }
            }
        }
        journeys
    }

    fn rail_then_surface(
        &self,
        snapshot: &TransitSnapshot,
        from: &TransitStop,
        interchange: &InterchangePoint,
        to: &TransitStop,
    ) -> Result<Journey, CandidateError> {
        let board = self
            .nearest_rail(snapshot, from.coordinate)
            .into_iter()
            .next()
            .ok_or(CandidateError::NoStopNearby {
                mode: TravelMode::Rail,
                end: TripEnd::Origin,
            })?;
        let alight = self
            .nearest_surface(snapshot, to.coordinate)
            .into_iter()
            .next()
            .ok_or(CandidateError::NoStopNearby {
                mode: TravelMode::Surface,
                end: TripEnd::Destination,
            })?;

        let mut legs = vec![self.legs.walk_leg(from, board)];
        legs.extend(self.rail_ride(snapshot, board, &interchange.rail_station)?);
        legs.push(
            self.legs
                .walk_leg(&interchange.rail_station, &interchange.surface_stop),
        );
        legs.push(self.surface_ride(&interchange.surface_stop, alight)?);
        legs.push(self.legs.walk_leg(alight, to));
        Ok(Journey::new(legs)?)
    }

    fn surface_then_rail(
        &self,
        snapshot: &TransitSnapshot,
        from: &TransitStop,
        interchange: &InterchangePoint,
        to: &TransitStop,
    ) -> Result<Journey, CandidateError> {
        let board = self
            .nearest_surface(snapshot, from.coordinate)
            .into_iter()
            .next()
            .ok_or(CandidateError::NoStopNearby {
                mode: TravelMode::Surface,
                end: TripEnd::Origin,
            })?;
        let alight = self
            .nearest_rail(snapshot, to.coordinate)
            .into_iter()
            .next()
            .ok_or(CandidateError::NoStopNearby {
                mode: TravelMode::Rail,
                end: TripEnd::Destination,
            })?;

        let mut legs = vec![
            self.legs.walk_leg(from, board),
            self.surface_ride(board, &interchange.surface_stop)?,
            self.legs
                .walk_leg(&interchange.surface_stop, &interchange.rail_station),
        ];
        legs.extend(self.rail_ride(snapshot, &interchange.rail_station, alight)?);
        legs.push(self.legs.walk_leg(alight, to));
        Ok(Journey::new(legs)?)
    }

    /// One rail leg per hop along the shortest path.
    fn rail_ride(
        &self,
        snapshot: &TransitSnapshot,
        board: &TransitStop,
        alight: &TransitStop,
    ) -> Result<Vec<JourneyLeg>, CandidateError> {
        if board.id == alight.id {
            return Err(CandidateError::DegenerateRide {
                mode: TravelMode::Rail,
                stop: board.id.clone(),
            });
        }

        let path = self.graph.shortest_path(&board.id, &alight.id);
        if path.is_empty() {
            return Err(CandidateError::NoRailPath {
                from: board.id.clone(),
                to: alight.id.clone(),
            });
        }

        let stations = path
            .iter()
            .map(|id| {
                snapshot
                    .rail_station(id)
                    .ok_or_else(|| CandidateError::UnknownStation(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stations
            .windows(2)
            .map(|hop| self.legs.rail_leg(hop[0], hop[1], hop[0].shared_line(hop[1])))
            .collect())
    }

    fn surface_ride(
        &self,
        board: &TransitStop,
        alight: &TransitStop,
    ) -> Result<JourneyLeg, CandidateError> {
        if board.id == alight.id {
            return Err(CandidateError::DegenerateRide {
                mode: TravelMode::Surface,
                stop: board.id.clone(),
            });
        }
        Ok(self.legs.approximate_surface_leg(board, alight))
    }

    fn nearest_rail<'a>(&self, snapshot: &'a TransitSnapshot, point: Coordinate) -> Vec<&'a TransitStop> {
        snapshot.nearest_rail(
            point,
            self.config.rail_search_radius_meters,
            self.config.rail_candidates,
        )
    }

    fn nearest_surface<'a>(
        &self,
        snapshot: &'a TransitSnapshot,
        point: Coordinate,
    ) -> Vec<&'a TransitStop> {
        snapshot.nearest_surface(
            point,
            self.config.surface_search_radius_meters,
            self.config.surface_candidates,
        )
    }
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
