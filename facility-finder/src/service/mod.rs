//! High-level facade wiring configuration to the search components.
//!
//! # Example
//!
//! ```no_run
//! use facility_finder::category::CategoryKey;
//! use facility_finder::config::ConfigFile;
//! use facility_finder::service::FacilityFinder;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let finder = FacilityFinder::from_config(ConfigFile::load()?)?;
//! let center = finder.default_center()?;
//! let result = finder.search(center, None, &[CategoryKey::Fuel]).await?;
//! println!("{} gas stations nearby", result.counts[&CategoryKey::Fuel]);
//! # Ok(())
//! # }
//! ```

mod error;
mod facade;

pub use error::ServiceError;
pub use facade::{FacilityFinder, LiveResolver};
