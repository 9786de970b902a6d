//! Journey leg type.
//!
//! A `JourneyLeg` is one atomic segment of a journey: a walk, a rail ride or
//! a surface-transit ride between two stops. Legs are built once, by the leg
//! synthesizer, and never mutated afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TransitStop;

/// What kind of travel a leg represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegKind {
    Walk,
    Rail,
    Surface,
}

impl fmt::Display for LegKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LegKind::Walk => "WALK",
            LegKind::Rail => "RAIL",
            LegKind::Surface => "SURFACE",
        })
    }
}

/// A leg of a journey.
///
/// # Invariants
///
/// - `duration_minutes` is the ceiling of distance over the mode's speed
/// - `route_is_advisory` is only set when `route` is present
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyLeg {
    kind: LegKind,
    from: TransitStop,
    to: TransitStop,
    distance_meters: f64,
    duration_minutes: u32,
    route: Option<String>,
    company: Option<String>,
    route_is_advisory: bool,
}

impl JourneyLeg {
    /// Construct a leg with no route or company attached.
    pub fn new(
        kind: LegKind,
        from: TransitStop,
        to: TransitStop,
        distance_meters: f64,
        duration_minutes: u32,
    ) -> Self {
        Self {
            kind,
            from,
            to,
            distance_meters,
            duration_minutes,
            route: None,
            company: None,
            route_is_advisory: false,
        }
    }

    /// Attach a route identifier known to be real (e.g. a rail line code).
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self.route_is_advisory = false;
        self
    }

    /// Attach an approximated route identifier.
    ///
    /// The label is a plausible guess, not a schedule lookup, and anything
    /// shown to a rider must present it as advisory.
    pub fn with_advisory_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self.route_is_advisory = true;
        self
    }

    /// Attach the operating company.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        let company = company.into();
        self.company = (!company.is_empty()).then_some(company);
        self
    }

    pub fn kind(&self) -> LegKind {
        self.kind
    }

    pub fn from(&self) -> &TransitStop {
        &self.from
    }

    pub fn to(&self) -> &TransitStop {
        &self.to
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Route or line identifier, if any.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// True if `route` is an approximation rather than ground truth.
    pub fn route_is_advisory(&self) -> bool {
        self.route_is_advisory
    }

    pub fn is_rail(&self) -> bool {
        self.kind == LegKind::Rail
    }

    pub fn is_walk(&self) -> bool {
        self.kind == LegKind::Walk
    }
}
