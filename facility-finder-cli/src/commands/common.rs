//! Helpers shared by several commands.

use facility_finder::category::CategoryKey;
use facility_finder::geo::Coordinate;
use facility_finder::geocode::GeocodeCandidate;
use facility_finder::service::FacilityFinder;

use crate::error::CliError;

/// clap value parser for `--category`.
pub fn parse_category(value: &str) -> Result<CategoryKey, String> {
    value.parse().map_err(|e: facility_finder::category::UnknownCategory| e.to_string())
}

/// Categories to search: the given ones, or all when none were given.
pub fn categories_or_all(categories: &[CategoryKey]) -> Vec<CategoryKey> {
    if categories.is_empty() {
        CategoryKey::all().to_vec()
    } else {
        categories.to_vec()
    }
}

/// Center from `--lat/--lon`, falling back to the configured map center.
pub fn resolve_center(
    finder: &FacilityFinder,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Coordinate, CliError> {
    let default = finder
        .default_center()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Coordinate::new(
        lat.unwrap_or(default.latitude()),
        lon.unwrap_or(default.longitude()),
    )
    .map_err(|e| CliError::InvalidArgument(e.to_string()))
}

/// Human-readable distance: meters below 1 km, kilometers above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

/// One line of a candidate list; `position` is 1-based.
pub fn format_candidate(position: usize, candidate: &GeocodeCandidate, highlighted: bool) -> String {
    let marker = if highlighted { '>' } else { ' ' };
    let name = if candidate.display_name.is_empty() {
        "(unnamed)"
    } else {
        candidate.display_name.as_str()
    };
    format!(
        "{} {:>2}. {}  [{} {:+}] ({})",
        marker,
        position,
        name,
        candidate.provenance,
        candidate.rank_score,
        candidate.coordinate
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_finder::geocode::ProviderId;

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("FUEL"), Ok(CategoryKey::Fuel));
        assert!(parse_category("bakery").unwrap_err().contains("bakery"));
    }

    #[test]
    fn test_categories_or_all() {
        assert_eq!(categories_or_all(&[]).len(), 5);
        assert_eq!(categories_or_all(&[CategoryKey::Arcade]), vec![CategoryKey::Arcade]);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(299.6), "300 m");
        assert_eq!(format_distance(1234.0), "1.23 km");
    }

    #[test]
    fn test_format_candidate() {
        let candidate = GeocodeCandidate {
            coordinate: Coordinate::new(25.0478, 121.517).unwrap(),
            display_name: "Taipei Main Station".to_string(),
            provenance: ProviderId::Photon,
            class_key: "railway".to_string(),
            class_value: "station".to_string(),
            rank_score: 140,
        };
        assert_eq!(
            format_candidate(1, &candidate, true),
            ">  1. Taipei Main Station  [photon +140] (25.047800, 121.517000)"
        );
        assert!(format_candidate(2, &candidate, false).starts_with("   2. "));
    }
}
