//! Domain types for the journey planner.
//!
//! This module contains the core domain model types: coordinates, stops,
//! legs and journeys. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod coordinate;
mod error;
mod journey;
mod leg;
mod stop;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use error::DomainError;
pub use journey::Journey;
pub use leg::{JourneyLeg, LegKind};
pub use stop::{TransitStop, TravelMode};
