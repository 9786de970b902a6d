//! Journey types.
//!
//! A `Journey` represents a complete trip from origin to destination as an
//! ordered chain of walk, rail and surface legs.

use uuid::Uuid;

use super::{DomainError, JourneyLeg, LegKind};

/// A complete journey from origin to destination.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (`legs[i].to` is the same stop as `legs[i + 1].from`,
///   by id and coordinate)
/// - Totals are the exact sums of the legs, in order
#[derive(Debug, Clone)]
pub struct Journey {
    id: Uuid,
    legs: Vec<JourneyLeg>,
    total_distance_meters: f64,
    total_duration_minutes: u32,
    indoor_protected: bool,
}

impl Journey {
    /// Constructs a journey from a chain of legs.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - Legs list is empty
    /// - Legs don't connect (destination stop != next origin stop)
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::domain::{Coordinate, Journey, JourneyLeg, LegKind, TransitStop};
    ///
    /// let origin = TransitStop::waypoint("origin", Coordinate::new_unchecked(22.2819, 114.1581));
    /// let destination = TransitStop::waypoint("destination", Coordinate::new_unchecked(22.2790, 114.1646));
    ///
    /// let walk = JourneyLeg::new(LegKind::Walk, origin, destination, 740.0, 10);
    /// let journey = Journey::new(vec![walk]).unwrap();
    ///
    /// assert_eq!(journey.leg_count(), 1);
    /// assert_eq!(journey.total_duration_minutes(), 10);
    /// ```
    pub fn new(legs: Vec<JourneyLeg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyJourney);
        }

        for window in legs.windows(2) {
            let ends_at = window[0].to();
            let starts_at = window[1].from();
            if !ends_at.same_place(starts_at) {
                return Err(DomainError::LegsNotContiguous {
                    ends_at: ends_at.id.clone(),
                    starts_at: starts_at.id.clone(),
                });
            }
        }

        let total_distance_meters = legs.iter().map(JourneyLeg::distance_meters).sum();
        let total_duration_minutes = legs.iter().map(JourneyLeg::duration_minutes).sum();
        let rail_legs = legs.iter().filter(|leg| leg.kind() == LegKind::Rail).count();

        Ok(Self {
            id: Uuid::new_v4(),
            total_distance_meters,
            total_duration_minutes,
            indoor_protected: rail_legs * 2 > legs.len(),
            legs,
        })
    }

    /// A journey made of one leg, which is always contiguous.
    pub fn single(leg: JourneyLeg) -> Self {
        Self {
            id: Uuid::new_v4(),
            total_distance_meters: leg.distance_meters(),
            total_duration_minutes: leg.duration_minutes(),
            indoor_protected: leg.kind() == LegKind::Rail,
            legs: vec![leg],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the legs in travel order.
    pub fn legs(&self) -> &[JourneyLeg] {
        &self.legs
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    pub fn total_distance_meters(&self) -> f64 {
        self.total_distance_meters
    }

    pub fn total_duration_minutes(&self) -> u32 {
        self.total_duration_minutes
    }

    /// True if most of the legs are on the rail network.
    pub fn indoor_protected(&self) -> bool {
        self.indoor_protected
    }

    /// Returns the first leg.
    pub fn first_leg(&self) -> &JourneyLeg {
        // Non-empty by construction
        &self.legs[0]
    }

    /// Returns the last leg.
    pub fn last_leg(&self) -> &JourneyLeg {
        &self.legs[self.legs.len() - 1]
    }

    /// True if this is a single walking leg.
    pub fn is_walk_only(&self) -> bool {
        self.legs.iter().all(JourneyLeg::is_walk)
    }

    /// True if any leg rides the rail network.
    pub fn uses_rail(&self) -> bool {
        self.legs.iter().any(JourneyLeg::is_rail)
    }

    /// Compare everything except the id.
    pub fn same_content(&self, other: &Journey) -> bool {
        self.legs == other.legs
            && self.total_distance_meters == other.total_distance_meters
            && self.total_duration_minutes == other.total_duration_minutes
            && self.indoor_protected == other.indoor_protected
    }
}
