//! Settings structs, one per `[section]` of the INI file.

use std::path::PathBuf;

use super::Language;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub overpass: OverpassSettings,
    pub geocode: GeocodeSettings,
    pub search: SearchSettings,
    pub map: MapSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

/// Overpass POI query settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassSettings {
    /// Endpoints tried in order until one answers
    pub endpoints: Vec<String>,
    /// HTTP client timeout in seconds
    pub request_timeout: u64,
}

/// Geocoder endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeSettings {
    pub photon_url: String,
    pub nominatim_url: String,
    /// Deadline for one callback request, in milliseconds
    pub transport_timeout_ms: u64,
}

/// Search-as-you-type behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub debounce_ms: u64,
    /// Shorter (trimmed) input clears the result list instead of searching
    pub min_query_chars: usize,
    /// Results shown in the list
    pub max_results: usize,
}

/// Initial map view.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub default_lat: f64,
    pub default_lon: f64,
    /// Search radius in meters
    pub default_radius: f64,
}

/// Interface preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct UiSettings {
    /// Stored language choice; `None` means detect from the environment
    pub language: Option<Language>,
}

/// Log output.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}
