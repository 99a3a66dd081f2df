//! User configuration.
//!
//! Settings live in an INI file at `~/.facility-finder/config.ini`. A missing
//! file means defaults; present keys are overlaid onto the defaults and
//! validated on load.
//!
//! # Example
//!
//! ```no_run
//! use facility_finder::config::{ConfigFile, ConfigKey};
//!
//! let mut config = ConfigFile::load()?;
//! ConfigKey::SearchDebounceMs.set(&mut config, "300")?;
//! config.save()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod defaults;
mod file;
mod keys;
mod language;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use language::{Language, UnknownLanguage};
pub use settings::*;
