//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::JourneyPlanner;
use crate::sources::DataSource;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Journey planner over the configured data source
    pub planner: Arc<JourneyPlanner<DataSource>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(planner: JourneyPlanner<DataSource>) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}
