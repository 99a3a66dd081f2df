//! Default values and the `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::geocode::{DEFAULT_NOMINATIM_URL, DEFAULT_PHOTON_URL};
use crate::spatial::DEFAULT_OVERPASS_ENDPOINTS;

/// Default HTTP client timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = crate::http::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Default callback request deadline in milliseconds.
pub const DEFAULT_TRANSPORT_TIMEOUT_MS: u64 = 12_000;

/// Default quiet period before a typed query is sent.
pub const DEFAULT_DEBOUNCE_MS: u64 = 220;

/// Default minimum query length, in characters.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

/// Default number of results shown.
pub const DEFAULT_MAX_RESULTS: usize = 8;

/// Default map center (Taipei Main Station).
pub const DEFAULT_MAP_LAT: f64 = 25.047675;
pub const DEFAULT_MAP_LON: f64 = 121.517055;

/// Default search radius in meters.
pub const DEFAULT_RADIUS_M: f64 = 500.0;

/// Log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "facility-finder.log";

/// Default log file path (~/.facility-finder/facility-finder.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join(DEFAULT_LOG_FILE_NAME)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            overpass: OverpassSettings {
                endpoints: DEFAULT_OVERPASS_ENDPOINTS
                    .iter()
                    .map(|e| e.to_string())
                    .collect(),
                request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            geocode: GeocodeSettings {
                photon_url: DEFAULT_PHOTON_URL.to_string(),
                nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
                transport_timeout_ms: DEFAULT_TRANSPORT_TIMEOUT_MS,
            },
            search: SearchSettings {
                debounce_ms: DEFAULT_DEBOUNCE_MS,
                min_query_chars: DEFAULT_MIN_QUERY_CHARS,
                max_results: DEFAULT_MAX_RESULTS,
            },
            map: MapSettings {
                default_lat: DEFAULT_MAP_LAT,
                default_lon: DEFAULT_MAP_LON,
                default_radius: DEFAULT_RADIUS_M,
            },
            ui: UiSettings { language: None },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}
