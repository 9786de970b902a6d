//! HTTP client for a live stop API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{TransitStop, TravelMode};

use super::TransitDataSource;
use super::dto::{RailStationsResponse, SurfaceStopsResponse, convert_stops};
use super::error::TransitDataError;

/// Configuration for the stop API client.
#[derive(Debug, Clone)]
pub struct HttpTransitConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Optional key sent in the `x-apikey` header
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl HttpTransitConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: 30,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the stop API.
///
/// Endpoints:
/// - `GET {base}/rail/stations` returns `{ "stations": [...] }`
/// - `GET {base}/surface/stops` returns `{ "stops": [...] }`
#[derive(Debug, Clone)]
pub struct HttpTransitClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransitClient {
    /// Create a new client.
    pub fn new(config: HttpTransitConfig) -> Result<Self, TransitDataError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| TransitDataError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static("x-apikey"), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransitDataError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "fetching stop data");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TransitDataError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransitDataError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TransitDataError::Json {
            message: e.to_string(),
        })
    }
}

impl TransitDataSource for HttpTransitClient {
    async fn fetch_all_rail_stations(&self) -> Result<Vec<TransitStop>, TransitDataError> {
        let response: RailStationsResponse = self.get_json("/rail/stations").await?;
        Ok(convert_stops(response.stations, TravelMode::Rail))
    }

    async fn fetch_all_surface_stops(&self) -> Result<Vec<TransitStop>, TransitDataError> {
        let response: SurfaceStopsResponse = self.get_json("/surface/stops").await?;
        Ok(convert_stops(response.stops, TravelMode::Surface))
    }
}
