//! Great-circle distance between coordinates.

use crate::domain::Coordinate;

/// Mean Earth radius used by the Haversine formula, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two coordinates, in metres.
///
/// NaN coordinates produce NaN; callers validate input before it gets here.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::Coordinate;
/// use transit_planner::geo::distance_meters;
///
/// let central = Coordinate::new_unchecked(22.2819, 114.1581);
/// assert_eq!(distance_meters(central, central), 0.0);
/// ```
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    // Absolute deltas keep the result bit-for-bit symmetric.
    let delta_lat = (b.latitude - a.latitude).abs().to_radians();
    let delta_lon = (b.longitude - a.longitude).abs().to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().clamp(0.0, 1.0).asin();

    EARTH_RADIUS_M * c
}
