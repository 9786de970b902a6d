//! Geographic coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a coordinate is non-finite or out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    reason: &'static str,
}

/// A WGS84 latitude/longitude pair in degrees.
///
/// Coordinates coming from users or devices go through [`Coordinate::new`],
/// which rejects non-finite and out-of-range values. Trusted data such as
/// compiled-in fixtures may use [`Coordinate::new_unchecked`].
///
/// # Examples
///
/// ```
/// use transit_planner::domain::Coordinate;
///
/// assert!(Coordinate::new(22.2829, 114.1582).is_ok());
///
/// // Latitude out of range
/// assert!(Coordinate::new(91.0, 0.0).is_err());
///
/// // NaN is rejected
/// assert!(Coordinate::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        Self::new_unchecked(latitude, longitude).validate()
    }

    /// Create a coordinate without range checks.
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and within range.
    pub fn validate(self) -> Result<Self, InvalidCoordinate> {
        let reject = |reason| InvalidCoordinate {
            latitude: self.latitude,
            longitude: self.longitude,
            reason,
        };

        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(reject("components must be finite"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(reject("latitude must be within -90..=90"));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(reject("longitude must be within -180..=180"));
        }

        Ok(self)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(90.0001, 0.0).is_err());
        assert!(Coordinate::new(-90.0001, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.0001).is_err());
        assert!(Coordinate::new(0.0, -180.0001).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn error_display() {
        let err = Coordinate::new(100.0, 0.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid coordinate (100, 0): latitude must be within -90..=90"
        );
    }

    #[test]
    fn display() {
        let c = Coordinate::new_unchecked(22.5, 114.25);
        assert_eq!(c.to_string(), "(22.5, 114.25)");
    }
}
