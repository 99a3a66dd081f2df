//! CLI runner for common setup.
//!
//! Loads configuration, initializes logging and builds the finder so each
//! command handler starts from the same place.

use tracing::info;

use facility_finder::config::ConfigFile;
use facility_finder::logging::{init_logging, LoggingGuard};
use facility_finder::service::FacilityFinder;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps the log writer alive while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load config and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `verbose` - Mirror log events to the terminal
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let logging_guard = init_logging(&config.logging.file, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!(version = facility_finder::VERSION, command = command, "facility-finder starting");
    }

    /// Build a finder from the loaded configuration.
    pub fn create_finder(&self) -> Result<FacilityFinder, CliError> {
        FacilityFinder::from_config(self.config.clone()).map_err(CliError::ServiceCreation)
    }
}
