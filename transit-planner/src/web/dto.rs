//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Coordinate, Journey, JourneyLeg, LegKind, TransitStop};

/// Locale used for stop names in responses.
const DISPLAY_LOCALE: &str = "en";

/// Request to plan a journey.
#[derive(Debug, Deserialize)]
pub struct PlanJourneyRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
}

/// Response for journey planning.
#[derive(Debug, Serialize)]
pub struct PlanJourneyResponse {
    /// Found journey options, best first
    pub journeys: Vec<JourneyResult>,
}

/// A journey option.
#[derive(Debug, Serialize)]
pub struct JourneyResult {
    pub id: Uuid,

    /// Legs in travel order
    pub legs: Vec<LegResult>,

    pub total_distance_meters: f64,
    pub total_duration_minutes: u32,

    /// Most of the trip is on the rail network
    pub indoor_protected: bool,
}

/// A single leg of a journey.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub kind: LegKind,
    pub from: StopInfo,
    pub to: StopInfo,
    pub distance_meters: f64,
    pub duration_minutes: u32,

    /// Line code or bus route
    pub route: Option<String>,

    /// Operating company
    pub company: Option<String>,

    /// The route is a plausible guess, not a schedule lookup
    pub route_advisory: bool,
}

/// Stop information.
#[derive(Debug, Serialize)]
pub struct StopInfo {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl JourneyResult {
    /// Create from a domain Journey.
    pub fn from_journey(journey: &Journey) -> Self {
        Self {
            id: journey.id(),
            legs: journey.legs().iter().map(LegResult::from_leg).collect(),
            total_distance_meters: journey.total_distance_meters(),
            total_duration_minutes: journey.total_duration_minutes(),
            indoor_protected: journey.indoor_protected(),
        }
    }
}

impl LegResult {
    /// Create from a domain JourneyLeg.
    pub fn from_leg(leg: &JourneyLeg) -> Self {
        Self {
            kind: leg.kind(),
            from: StopInfo::from_stop(leg.from()),
            to: StopInfo::from_stop(leg.to()),
            distance_meters: leg.distance_meters(),
            duration_minutes: leg.duration_minutes(),
            route: leg.route().map(str::to_string),
            company: leg.company().map(str::to_string),
            route_advisory: leg.route_is_advisory(),
        }
    }
}

impl StopInfo {
    pub fn from_stop(stop: &TransitStop) -> Self {
        Self {
            id: stop.id.clone(),
            name: stop.display_name(DISPLAY_LOCALE).to_string(),
            latitude: stop.coordinate.latitude,
            longitude: stop.coordinate.longitude,
        }
    }
}
