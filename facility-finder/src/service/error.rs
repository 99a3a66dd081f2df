//! Service error types.

use std::fmt;

use crate::geo::CoordError;
use crate::http::HttpError;
use crate::spatial::SpatialError;

/// Errors that can occur during service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Failed to create the HTTP client
    HttpClient(HttpError),
    /// A center coordinate (configured or supplied) is out of range
    InvalidCenter(CoordError),
    /// The POI search failed
    Spatial(SpatialError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpClient(e) => write!(f, "HTTP client error: {}", e),
            Self::InvalidCenter(e) => write!(f, "Invalid center: {}", e),
            Self::Spatial(e) => write!(f, "Search failed: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(e) => Some(e),
            Self::InvalidCenter(e) => Some(e),
            Self::Spatial(e) => Some(e),
        }
    }
}

impl From<HttpError> for ServiceError {
    fn from(e: HttpError) -> Self {
        Self::HttpClient(e)
    }
}

impl From<CoordError> for ServiceError {
    fn from(e: CoordError) -> Self {
        Self::InvalidCenter(e)
    }
}

impl From<SpatialError> for ServiceError {
    fn from(e: SpatialError) -> Self {
        Self::Spatial(e)
    }
}
