//! Server settings read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::sources::{DataSource, FixtureTransitSource, HttpTransitClient, HttpTransitConfig, TransitDataError};

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default fixture directory, used when no API URL is set.
pub const DEFAULT_FIXTURE_DIR: &str = "data/fixtures";

/// Error reading server settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Where stop data comes from.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    /// Live stop API
    Http(HttpTransitConfig),
    /// Directory of JSON fixtures
    Fixture(PathBuf),
}

impl SourceConfig {
    /// Build the data source.
    pub fn build(&self) -> Result<DataSource, TransitDataError> {
        match self {
            SourceConfig::Http(config) => Ok(DataSource::Http(HttpTransitClient::new(config.clone())?)),
            SourceConfig::Fixture(dir) => Ok(DataSource::Fixture(FixtureTransitSource::new(dir))),
        }
    }
}

/// Settings for the HTTP server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub source: SourceConfig,
}

impl ServerConfig {
    /// Read settings from the process environment.
    ///
    /// - `BIND_ADDR` (default `127.0.0.1:3000`)
    /// - `TRANSIT_API_URL`: use the live API at this base URL
    /// - `TRANSIT_API_KEY`: optional key for the live API
    /// - `TRANSIT_FIXTURE_DIR`: fixture directory when no API URL is set
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns the value of a variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind = value("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind.clone(),
                source,
            })?;

        let source = match value("TRANSIT_API_URL") {
            Some(url) => {
                let mut config = HttpTransitConfig::new(url);
                if let Some(key) = value("TRANSIT_API_KEY") {
                    config = config.with_api_key(key);
                }
                SourceConfig::Http(config)
            }
            None => SourceConfig::Fixture(
                value("TRANSIT_FIXTURE_DIR")
                    .unwrap_or_else(|| DEFAULT_FIXTURE_DIR.to_string())
                    .into(),
            ),
        };

        Ok(Self { bind_addr, source })
    }
}
