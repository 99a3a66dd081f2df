//! Geographic primitives.
//!
//! Provides the validated [`Coordinate`] type and the great-circle distance
//! used to post-filter spatial query results to an exact radius.

mod types;

pub use types::{CoordError, Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Calculate the great-circle distance between two coordinates.
///
/// Uses the haversine formula on a spherical Earth of radius
/// [`EARTH_RADIUS_M`].
///
/// # Returns
///
/// Distance in meters.
///
/// # Example
///
/// ```
/// use facility_finder::geo::{distance_m, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(1.0, 0.0).unwrap();
/// let d = distance_m(a, b);
/// assert!((d - 111_194.93).abs() < 0.01); // 1 degree of latitude
/// ```
#[inline]
pub fn distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude() * DEG_TO_RAD;
    let lat_b = b.latitude() * DEG_TO_RAD;
    let delta_lat = (b.latitude() - a.latitude()) * DEG_TO_RAD;
    let delta_lon = (b.longitude() - a.longitude()) * DEG_TO_RAD;

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[cfg(test)]
mod tests;
