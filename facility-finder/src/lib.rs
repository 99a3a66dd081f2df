//! Facility Finder - nearby point-of-interest search over OpenStreetMap
//!
//! Finds temples, cemeteries, gas stations, internet cafes and arcades
//! around a map center, and resolves free-text place names to coordinates.
//!
//! # Components
//!
//! - [`spatial`]: Overpass queries with endpoint rotation, radius filtering
//!   and classification into [`category`] keys
//! - [`geocode`]: Photon and Nominatim lookups with fallback and POI-first
//!   ranking, over the JSONP [`transport`]
//! - [`session`]: debounced search-as-you-type with stale-answer suppression
//! - [`service`]: one facade wiring all of the above from [`config`]
//!
//! # Example
//!
//! ```no_run
//! use facility_finder::config::ConfigFile;
//! use facility_finder::service::FacilityFinder;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let finder = FacilityFinder::from_config(ConfigFile::load()?)?;
//! for place in finder.geocode("台北車站").await {
//!     println!("{} ({})", place.display_name, place.coordinate);
//! }
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod config;
pub mod geo;
pub mod geocode;
pub mod http;
pub mod logging;
pub mod service;
pub mod session;
pub mod spatial;
pub mod transport;

/// Version of the library and CLI.
///
/// Synchronized across the workspace; defined in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
