//! Tests for coordinates and distance

use super::*;
use proptest::prelude::*;

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

/// Straight transcription of the haversine formula used as the reference.
fn reference_distance(a: Coordinate, b: Coordinate) -> f64 {
    let to_rad = |d: f64| d * std::f64::consts::PI / 180.0;
    let d_lat = to_rad(b.latitude() - a.latitude());
    let d_lon = to_rad(b.longitude() - a.longitude());
    let h = (d_lat / 2.0).sin().powi(2)
        + to_rad(a.latitude()).cos() * to_rad(b.latitude()).cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * 6_371_000.0 * h.sqrt().asin()
}

#[test]
fn test_valid_coordinate() {
    let c = coord(25.0330, 121.5654);
    assert_eq!(c.latitude(), 25.0330);
    assert_eq!(c.longitude(), 121.5654);
}

#[test]
fn test_range_edges_are_valid() {
    assert!(Coordinate::new(90.0, 180.0).is_ok());
    assert!(Coordinate::new(-90.0, -180.0).is_ok());
}

#[test]
fn test_invalid_latitude() {
    let result = Coordinate::new(90.5, 0.0);
    assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
}

#[test]
fn test_invalid_longitude() {
    let result = Coordinate::new(0.0, -180.1);
    assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
}

#[test]
fn test_nan_is_rejected() {
    assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    assert!(Coordinate::new(0.0, f64::NAN).is_err());
}

#[test]
fn test_display_uses_six_decimals() {
    assert_eq!(coord(25.04, 121.5).to_string(), "25.040000, 121.500000");
}

#[test]
fn test_one_degree_of_latitude() {
    let d = distance_m(coord(0.0, 0.0), coord(1.0, 0.0));
    let expected = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
    assert!((d - expected).abs() / expected < 1e-9);
}

#[test]
fn test_taipei_short_hop() {
    // Taipei 101 to Taipei Main Station is roughly 5.3 km
    let d = distance_m(coord(25.0330, 121.5654), coord(25.0478, 121.5170));
    assert!((5_000.0..5_600.0).contains(&d), "got {}", d);
}

#[test]
fn test_antipodal_points() {
    let d = distance_m(coord(0.0, 0.0), coord(0.0, 180.0));
    let half_circumference = EARTH_RADIUS_M * std::f64::consts::PI;
    assert!((d - half_circumference).abs() < 1e-3);
}

fn arb_coordinate() -> impl Strategy<Value = Coordinate> {
    (MIN_LAT..=MAX_LAT, MIN_LON..=MAX_LON).prop_map(|(lat, lon)| coord(lat, lon))
}

proptest! {
    #[test]
    fn prop_distance_is_symmetric(a in arb_coordinate(), b in arb_coordinate()) {
        prop_assert_eq!(distance_m(a, b), distance_m(b, a));
    }

    #[test]
    fn prop_distance_to_self_is_zero(a in arb_coordinate()) {
        prop_assert_eq!(distance_m(a, a), 0.0);
    }

    #[test]
    fn prop_matches_reference(a in arb_coordinate(), b in arb_coordinate()) {
        let ours = distance_m(a, b);
        let reference = reference_distance(a, b);
        let scale = reference.abs().max(1.0);
        prop_assert!((ours - reference).abs() / scale <= 1e-6);
    }

    #[test]
    fn prop_distance_is_bounded(a in arb_coordinate(), b in arb_coordinate()) {
        let d = distance_m(a, b);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= EARTH_RADIUS_M * std::f64::consts::PI + 1e-6);
    }
}
