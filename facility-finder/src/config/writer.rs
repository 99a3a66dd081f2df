//! INI serialization: `ConfigFile` → commented config.ini text.

use std::path::Path;

use super::settings::ConfigFile;

/// Render a `ConfigFile` as the commented INI written to disk.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let language = config
        .ui
        .language
        .map(|l| l.code().to_string())
        .unwrap_or_default();

    format!(
        r#"[overpass]
; Overpass API endpoints, comma separated. Tried in order; the first one
; that answers with usable data wins.
endpoints = {}
; HTTP timeout in seconds for a single endpoint (default: 30)
request_timeout = {}

[geocode]
; Primary geocoder (Photon)
photon_url = {}
; Fallback geocoder (Nominatim), used only when Photon finds nothing
nominatim_url = {}
; Give up on a geocoder answer after this many milliseconds (default: 12000)
transport_timeout_ms = {}

[search]
; Wait this long after the last keystroke before searching (default: 220)
debounce_ms = {}
; Shorter input clears the result list (default: 2)
min_query_chars = {}
; Number of place suggestions shown (default: 8)
max_results = {}

[map]
; Initial map center
default_lat = {}
default_lon = {}
; Search radius in meters (default: 500)
default_radius = {}

[ui]
; Interface language: zh-Hant or en
; Leave empty to follow the LANG environment variable
language = {}

[logging]
; Log file, recreated at every start
file = {}
"#,
        config.overpass.endpoints.join(", "),
        config.overpass.request_timeout,
        config.geocode.photon_url,
        config.geocode.nominatim_url,
        config.geocode.transport_timeout_ms,
        config.search.debounce_ms,
        config.search.min_query_chars,
        config.search.max_results,
        config.map.default_lat,
        config.map.default_lon,
        config.map.default_radius,
        language,
        path_to_string(&config.logging.file),
    )
}

/// Convert a path to a string, collapsing the home directory to `~`.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
