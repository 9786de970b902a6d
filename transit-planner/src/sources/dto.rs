//! Wire format for stop data, shared by the HTTP API and fixture files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Coordinate, InvalidCoordinate, TransitStop, TravelMode};

/// Wrapper for the rail stations response.
#[derive(Debug, Serialize, Deserialize)]
pub struct RailStationsResponse {
    pub stations: Vec<StopDto>,
}

/// Wrapper for the surface stops response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SurfaceStopsResponse {
    pub stops: Vec<StopDto>,
}

/// A stop as delivered by a data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDto {
    pub id: String,
    /// Names keyed by locale
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub company: String,
    /// Line codes, rail stations only
    #[serde(default)]
    pub lines: Vec<String>,
}

impl StopDto {
    /// Convert to a domain stop of the given mode, validating the coordinate.
    pub fn into_stop(self, mode: TravelMode) -> Result<TransitStop, InvalidCoordinate> {
        let coordinate = Coordinate::new(self.latitude, self.longitude)?;
        let mut stop = match mode {
            TravelMode::Rail => {
                TransitStop::rail(self.id, String::new(), coordinate, self.company, self.lines)
            }
            TravelMode::Surface => {
                TransitStop::surface(self.id, String::new(), coordinate, self.company)
            }
            TravelMode::Walk => TransitStop::waypoint(self.id, coordinate),
        };
        stop.names = self.names;
        Ok(stop)
    }
}

/// Convert a batch of DTOs, dropping records with invalid coordinates.
pub(crate) fn convert_stops(dtos: Vec<StopDto>, mode: TravelMode) -> Vec<TransitStop> {
    dtos.into_iter()
        .filter_map(|dto| {
            let id = dto.id.clone();
            match dto.into_stop(mode) {
                Ok(stop) => Some(stop),
                Err(e) => {
                    warn!(stop = %id, %mode, error = %e, "dropping stop with invalid coordinate");
                    None
                }
            }
        })
        .collect()
}
