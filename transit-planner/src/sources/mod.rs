//! Transit data sources.
//!
//! The planner needs two complete snapshots: every rail station (with the
//! lines serving it) and every surface-transit stop. This module defines the
//! contract for fetching them and ships two implementations: an HTTP client
//! for a live stop API and a fixture source that reads JSON files from disk.

mod dto;
mod error;
mod fixture;
mod http;

use std::future::Future;

use crate::domain::TransitStop;

pub use dto::{RailStationsResponse, StopDto, SurfaceStopsResponse};
pub use error::TransitDataError;
pub use fixture::FixtureTransitSource;
pub use http::{HttpTransitClient, HttpTransitConfig};

/// Trait for providing the full set of stops.
///
/// This abstraction allows the planner to be tested with mock data.
pub trait TransitDataSource: Send + Sync {
    /// Fetch every rail station. Must return a complete, current snapshot.
    fn fetch_all_rail_stations(
        &self,
    ) -> impl Future<Output = Result<Vec<TransitStop>, TransitDataError>> + Send;

    /// Fetch every surface-transit stop, annotated with its company.
    fn fetch_all_surface_stops(
        &self,
    ) -> impl Future<Output = Result<Vec<TransitStop>, TransitDataError>> + Send;
}

/// The source selected at startup.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Live stop API
    Http(HttpTransitClient),
    /// JSON files on disk
    Fixture(FixtureTransitSource),
}

impl TransitDataSource for DataSource {
    async fn fetch_all_rail_stations(&self) -> Result<Vec<TransitStop>, TransitDataError> {
        match self {
            DataSource::Http(client) => client.fetch_all_rail_stations().await,
            DataSource::Fixture(fixture) => fixture.fetch_all_rail_stations().await,
        }
    }

    async fn fetch_all_surface_stops(&self) -> Result<Vec<TransitStop>, TransitDataError> {
        match self {
            DataSource::Http(client) => client.fetch_all_surface_stops().await,
            DataSource::Fixture(fixture) => fixture.fetch_all_surface_stops().await,
        }
    }
}
