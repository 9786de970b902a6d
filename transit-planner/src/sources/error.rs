//! Transit data source error types.

/// Errors that can occur when fetching stop data.
///
/// The planner treats every variant the same way: data is unavailable and
/// it degrades to a walking-only answer.
#[derive(Debug, thiserror::Error)]
pub enum TransitDataError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check TRANSIT_API_KEY")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Failed to read fixture data
    #[error("I/O error: {message}")]
    Io { message: String },
}
