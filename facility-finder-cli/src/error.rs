//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use facility_finder::config::ConfigFileError;
use facility_finder::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to create the finder
    ServiceCreation(ServiceError),
    /// POI search failed
    Search(ServiceError),
    /// Bad command-line input
    InvalidArgument(String),
    /// Reading stdin or writing stdout failed
    Io(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Search(ServiceError::Spatial(_)) => {
                eprintln!();
                eprintln!("The public Overpass servers are often busy. You can:");
                eprintln!("  1. Try again in a minute");
                eprintln!("  2. Use a smaller --radius");
                eprintln!("  3. Add endpoints with: facility-finder config set overpass.endpoints <url>,<url>");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Use 'facility-finder config list' to see current settings.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ServiceCreation(e) => write!(f, "Failed to start: {}", e),
            CliError::Search(e) => write!(f, "{}", e),
            CliError::InvalidArgument(msg) => write!(f, "{}", msg),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ServiceCreation(e) => Some(e),
            CliError::Search(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Search(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_finder::spatial::SpatialError;

    #[test]
    fn test_messages() {
        let err = CliError::Search(ServiceError::Spatial(SpatialError::NoCategories));
        assert_eq!(err.to_string(), "Search failed: At least one category must be selected");

        let err = CliError::Config("bad".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad");
    }

    #[test]
    fn test_config_file_error_converts() {
        let err: CliError = ConfigFileError::WriteError("disk full".to_string()).into();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("disk full")));
    }
}
