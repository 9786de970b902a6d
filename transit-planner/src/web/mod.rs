//! Web layer for the journey planner.
//!
//! Provides a JSON API for planning journeys.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
