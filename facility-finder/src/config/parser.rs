//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use super::Language;
use crate::geo::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Overlay the values found in `ini` onto `ConfigFile::default()`.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("overpass")) {
        let s = SectionReader::new("overpass", section);
        if let Some(v) = s.raw("endpoints") {
            config.overpass.endpoints = parse_endpoint_list(v)
                .map_err(|reason| s.invalid("endpoints", v, reason))?;
        }
        if let Some(v) = s.positive::<u64>("request_timeout")? {
            config.overpass.request_timeout = v;
        }
    }

    if let Some(section) = ini.section(Some("geocode")) {
        let s = SectionReader::new("geocode", section);
        if let Some(v) = s.url("photon_url")? {
            config.geocode.photon_url = v;
        }
        if let Some(v) = s.url("nominatim_url")? {
            config.geocode.nominatim_url = v;
        }
        if let Some(v) = s.positive::<u64>("transport_timeout_ms")? {
            config.geocode.transport_timeout_ms = v;
        }
    }

    if let Some(section) = ini.section(Some("search")) {
        let s = SectionReader::new("search", section);
        if let Some(v) = s.number::<u64>("debounce_ms", "must be a whole number of milliseconds")? {
            config.search.debounce_ms = v;
        }
        if let Some(v) = s.positive::<usize>("min_query_chars")? {
            config.search.min_query_chars = v;
        }
        if let Some(v) = s.positive::<usize>("max_results")? {
            config.search.max_results = v;
        }
    }

    if let Some(section) = ini.section(Some("map")) {
        let s = SectionReader::new("map", section);
        if let Some(v) = s.in_range("default_lat", MIN_LAT, MAX_LAT)? {
            config.map.default_lat = v;
        }
        if let Some(v) = s.in_range("default_lon", MIN_LON, MAX_LON)? {
            config.map.default_lon = v;
        }
        if let Some(v) = s.raw("default_radius") {
            config.map.default_radius =
                parse_radius(v).map_err(|reason| s.invalid("default_radius", v, reason))?;
        }
    }

    if let Some(section) = ini.section(Some("ui")) {
        let s = SectionReader::new("ui", section);
        if let Some(v) = s.raw("language") {
            config.ui.language = parse_language(v).map_err(|reason| s.invalid("language", v, reason))?;
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        let s = SectionReader::new("logging", section);
        if let Some(v) = s.raw("file") {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

/// Reads and validates the keys of one section.
struct SectionReader<'a> {
    name: &'static str,
    props: &'a Properties,
}

impl<'a> SectionReader<'a> {
    fn new(name: &'static str, props: &'a Properties) -> Self {
        Self { name, props }
    }

    /// Trimmed value, with empty treated as absent.
    fn raw(&self, key: &str) -> Option<&'a str> {
        self.props.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    fn invalid(&self, key: &str, value: &str, reason: impl Into<String>) -> ConfigFileError {
        ConfigFileError::InvalidValue {
            section: self.name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    fn number<T: FromStr>(&self, key: &str, reason: &str) -> Result<Option<T>, ConfigFileError> {
        self.raw(key)
            .map(|v| v.parse::<T>().map_err(|_| self.invalid(key, v, reason)))
            .transpose()
    }

    fn positive<T: FromStr + PartialOrd + Default>(
        &self,
        key: &str,
    ) -> Result<Option<T>, ConfigFileError> {
        match self.raw(key) {
            Some(v) => match v.parse::<T>() {
                Ok(n) if n > T::default() => Ok(Some(n)),
                _ => Err(self.invalid(key, v, "must be a positive integer")),
            },
            None => Ok(None),
        }
    }

    fn in_range(&self, key: &str, min: f64, max: f64) -> Result<Option<f64>, ConfigFileError> {
        match self.raw(key) {
            Some(v) => match v.parse::<f64>() {
                Ok(n) if (min..=max).contains(&n) => Ok(Some(n)),
                _ => Err(self.invalid(key, v, format!("must be a number between {} and {}", min, max))),
            },
            None => Ok(None),
        }
    }

    fn url(&self, key: &str) -> Result<Option<String>, ConfigFileError> {
        self.raw(key)
            .map(|v| {
                parse_url(v)
                    .map(|_| v.to_string())
                    .map_err(|reason| self.invalid(key, v, reason))
            })
            .transpose()
    }
}

/// Validate an absolute http(s) URL.
pub(super) fn parse_url(value: &str) -> Result<url::Url, String> {
    let parsed = url::Url::parse(value.trim()).map_err(|e| format!("not a valid URL: {}", e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(format!("unsupported scheme '{}', expected http or https", other)),
    }
}

/// Split a comma-separated endpoint list; at least one URL is required.
pub(super) fn parse_endpoint_list(value: &str) -> Result<Vec<String>, String> {
    let endpoints: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(String::from)
        .collect();
    if endpoints.is_empty() {
        return Err("at least one endpoint is required".to_string());
    }
    for endpoint in &endpoints {
        parse_url(endpoint)?;
    }
    Ok(endpoints)
}

pub(super) fn parse_radius(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(r) if r.is_finite() && r > 0.0 => Ok(r),
        _ => Err("must be a positive number of meters".to_string()),
    }
}

/// Empty means "no stored preference".
pub(super) fn parse_language(value: &str) -> Result<Option<Language>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|e: super::UnknownLanguage| e.to_string())
}

/// Expand ~ to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;

    fn parse(text: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(text).unwrap();
        parse_ini(&ini)
    }

    fn invalid_key(err: ConfigFileError) -> String {
        match err {
            ConfigFileError::InvalidValue { section, key, .. } => format!("{}.{}", section, key),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_ini_is_default() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_overlays_values() {
        let config = parse(
            "[overpass]\n\
             endpoints = https://one.example/api/interpreter , https://two.example/api/interpreter\n\
             request_timeout = 45\n\
             [search]\n\
             debounce_ms = 0\n\
             max_results = 5\n\
             [map]\n\
             default_lat = 25.0330\n\
             default_lon = 121.5654\n\
             default_radius = 800\n\
             [ui]\n\
             language = en-US\n",
        )
        .unwrap();

        assert_eq!(
            config.overpass.endpoints,
            vec!["https://one.example/api/interpreter", "https://two.example/api/interpreter"]
        );
        assert_eq!(config.overpass.request_timeout, 45);
        assert_eq!(config.search.debounce_ms, 0);
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.min_query_chars, DEFAULT_MIN_QUERY_CHARS);
        assert_eq!(config.map.default_lat, 25.0330);
        assert_eq!(config.map.default_radius, 800.0);
        assert_eq!(config.ui.language, Some(Language::English));
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = parse("[ui]\nlanguage =\n[search]\ndebounce_ms =\n").unwrap();
        assert_eq!(config.ui.language, None);
        assert_eq!(config.search.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            ("[overpass]\nendpoints = ,\n", "overpass.endpoints"),
            ("[overpass]\nendpoints = ftp://x.example\n", "overpass.endpoints"),
            ("[overpass]\nrequest_timeout = 0\n", "overpass.request_timeout"),
            ("[geocode]\nphoton_url = photon\n", "geocode.photon_url"),
            ("[search]\nmax_results = -3\n", "search.max_results"),
            ("[map]\ndefault_lat = 91\n", "map.default_lat"),
            ("[map]\ndefault_lon = east\n", "map.default_lon"),
            ("[map]\ndefault_radius = 0\n", "map.default_radius"),
            ("[ui]\nlanguage = klingon\n", "ui.language"),
        ];
        for (text, key) in cases {
            assert_eq!(invalid_key(parse(text).unwrap_err()), key, "{}", text);
        }
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/logs/ff.log");
        assert!(!expanded.starts_with("~"));
        assert!(expanded.ends_with("logs/ff.log"));
        assert_eq!(expand_tilde("/var/log/ff.log"), PathBuf::from("/var/log/ff.log"));
    }
}
