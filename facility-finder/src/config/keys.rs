//! Typed access to configuration values by `section.key` name.
//!
//! Backs the `config get/set/list` CLI commands. Every key knows how to
//! render its value and how to validate and apply a new one; validation
//! shares the parser's rules so the file and the CLI accept the same input.

use std::str::FromStr;

use thiserror::Error;

use super::parser::{expand_tilde, parse_endpoint_list, parse_language, parse_radius, parse_url};
use super::settings::ConfigFile;
use super::writer::path_to_string;
use crate::geo::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    OverpassEndpoints,
    OverpassRequestTimeout,

    GeocodePhotonUrl,
    GeocodeNominatimUrl,
    GeocodeTransportTimeoutMs,

    SearchDebounceMs,
    SearchMinQueryChars,
    SearchMaxResults,

    MapDefaultLat,
    MapDefaultLon,
    MapDefaultRadius,

    UiLanguage,

    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Canonical key name (e.g. "search.debounce_ms").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::OverpassEndpoints => "overpass.endpoints",
            ConfigKey::OverpassRequestTimeout => "overpass.request_timeout",
            ConfigKey::GeocodePhotonUrl => "geocode.photon_url",
            ConfigKey::GeocodeNominatimUrl => "geocode.nominatim_url",
            ConfigKey::GeocodeTransportTimeoutMs => "geocode.transport_timeout_ms",
            ConfigKey::SearchDebounceMs => "search.debounce_ms",
            ConfigKey::SearchMinQueryChars => "search.min_query_chars",
            ConfigKey::SearchMaxResults => "search.max_results",
            ConfigKey::MapDefaultLat => "map.default_lat",
            ConfigKey::MapDefaultLon => "map.default_lon",
            ConfigKey::MapDefaultRadius => "map.default_radius",
            ConfigKey::UiLanguage => "ui.language",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Section name (e.g. "search").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Key name within the section (e.g. "debounce_ms").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Current value as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::OverpassEndpoints => config.overpass.endpoints.join(", "),
            ConfigKey::OverpassRequestTimeout => config.overpass.request_timeout.to_string(),
            ConfigKey::GeocodePhotonUrl => config.geocode.photon_url.clone(),
            ConfigKey::GeocodeNominatimUrl => config.geocode.nominatim_url.clone(),
            ConfigKey::GeocodeTransportTimeoutMs => config.geocode.transport_timeout_ms.to_string(),
            ConfigKey::SearchDebounceMs => config.search.debounce_ms.to_string(),
            ConfigKey::SearchMinQueryChars => config.search.min_query_chars.to_string(),
            ConfigKey::SearchMaxResults => config.search.max_results.to_string(),
            ConfigKey::MapDefaultLat => config.map.default_lat.to_string(),
            ConfigKey::MapDefaultLon => config.map.default_lon.to_string(),
            ConfigKey::MapDefaultRadius => config.map.default_radius.to_string(),
            ConfigKey::UiLanguage => config
                .ui
                .language
                .map(|l| l.code().to_string())
                .unwrap_or_default(),
            ConfigKey::LoggingFile => path_to_string(&config.logging.file),
        }
    }

    /// Validate `value` and apply it. The config is untouched on error.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let value = value.trim();
        match self {
            ConfigKey::OverpassEndpoints => {
                config.overpass.endpoints = self.check(parse_endpoint_list(value))?;
            }
            ConfigKey::OverpassRequestTimeout => {
                config.overpass.request_timeout = self.positive(value)?;
            }
            ConfigKey::GeocodePhotonUrl => {
                self.check(parse_url(value))?;
                config.geocode.photon_url = value.to_string();
            }
            ConfigKey::GeocodeNominatimUrl => {
                self.check(parse_url(value))?;
                config.geocode.nominatim_url = value.to_string();
            }
            ConfigKey::GeocodeTransportTimeoutMs => {
                config.geocode.transport_timeout_ms = self.positive(value)?;
            }
            ConfigKey::SearchDebounceMs => {
                config.search.debounce_ms = self.check(
                    value
                        .parse::<u64>()
                        .map_err(|_| "must be a whole number of milliseconds".to_string()),
                )?;
            }
            ConfigKey::SearchMinQueryChars => {
                config.search.min_query_chars = self.positive(value)?;
            }
            ConfigKey::SearchMaxResults => {
                config.search.max_results = self.positive(value)?;
            }
            ConfigKey::MapDefaultLat => {
                config.map.default_lat = self.in_range(value, MIN_LAT, MAX_LAT)?;
            }
            ConfigKey::MapDefaultLon => {
                config.map.default_lon = self.in_range(value, MIN_LON, MAX_LON)?;
            }
            ConfigKey::MapDefaultRadius => {
                config.map.default_radius = self.check(parse_radius(value))?;
            }
            ConfigKey::UiLanguage => {
                config.ui.language = self.check(parse_language(value))?;
            }
            ConfigKey::LoggingFile => {
                if value.is_empty() {
                    return Err(self.failed("must be a valid path"));
                }
                config.logging.file = expand_tilde(value);
            }
        }
        Ok(())
    }

    /// Check a value without applying it.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        let mut scratch = ConfigFile::default();
        self.set(&mut scratch, value)
    }

    /// All supported keys, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::OverpassEndpoints,
            ConfigKey::OverpassRequestTimeout,
            ConfigKey::GeocodePhotonUrl,
            ConfigKey::GeocodeNominatimUrl,
            ConfigKey::GeocodeTransportTimeoutMs,
            ConfigKey::SearchDebounceMs,
            ConfigKey::SearchMinQueryChars,
            ConfigKey::SearchMaxResults,
            ConfigKey::MapDefaultLat,
            ConfigKey::MapDefaultLon,
            ConfigKey::MapDefaultRadius,
            ConfigKey::UiLanguage,
            ConfigKey::LoggingFile,
        ]
    }

    fn failed(&self, reason: impl Into<String>) -> ConfigKeyError {
        ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: reason.into(),
        }
    }

    fn check<T>(&self, result: Result<T, String>) -> Result<T, ConfigKeyError> {
        result.map_err(|reason| self.failed(reason))
    }

    fn positive<T: FromStr + PartialOrd + Default>(&self, value: &str) -> Result<T, ConfigKeyError> {
        match value.parse::<T>() {
            Ok(n) if n > T::default() => Ok(n),
            _ => Err(self.failed("must be a positive integer")),
        }
    }

    fn in_range(&self, value: &str, min: f64, max: f64) -> Result<f64, ConfigKeyError> {
        match value.parse::<f64>() {
            Ok(n) if (min..=max).contains(&n) => Ok(n),
            _ => Err(self.failed(format!("must be a number between {} and {}", min, max))),
        }
    }
}
