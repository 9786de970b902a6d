//! Fixture data source for development and testing without API access.
//!
//! Loads stop snapshots from JSON files and serves them as if they were
//! live API responses.

use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::domain::{TransitStop, TravelMode};

use super::TransitDataSource;
use super::dto::{RailStationsResponse, SurfaceStopsResponse, convert_stops};
use super::error::TransitDataError;

/// File holding the rail snapshot, in the same shape as `GET /rail/stations`.
pub const RAIL_STATIONS_FILE: &str = "rail_stations.json";
/// File holding the surface snapshot, in the same shape as `GET /surface/stops`.
pub const SURFACE_STOPS_FILE: &str = "surface_stops.json";

/// Data source that reads `rail_stations.json` and `surface_stops.json`
/// from a directory on every fetch.
#[derive(Debug, Clone)]
pub struct FixtureTransitSource {
    dir: PathBuf,
}

impl FixtureTransitSource {
    /// Create a source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read<T: DeserializeOwned>(&self, file: &str) -> Result<T, TransitDataError> {
        let path = self.dir.join(file);
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| TransitDataError::Io {
                message: format!("failed to read {}: {}", path.display(), e),
            })?;

        serde_json::from_str(&json).map_err(|e| TransitDataError::Json {
            message: format!("failed to parse {}: {}", path.display(), e),
        })
    }
}

impl TransitDataSource for FixtureTransitSource {
    async fn fetch_all_rail_stations(&self) -> Result<Vec<TransitStop>, TransitDataError> {
        let response: RailStationsResponse = self.read(RAIL_STATIONS_FILE).await?;
        Ok(convert_stops(response.stations, TravelMode::Rail))
    }

    async fn fetch_all_surface_stops(&self) -> Result<Vec<TransitStop>, TransitDataError> {
        let response: SurfaceStopsResponse = self.read(SURFACE_STOPS_FILE).await?;
        Ok(convert_stops(response.stops, TravelMode::Surface))
    }
}
