//! Fuzzy place-name geocoding.
//!
//! Two interchangeable providers sit behind [`GeocodeProvider`]:
//!
//! - [`PhotonProvider`] (primary): fast, POI-aware, GeoJSON answers
//! - [`NominatimProvider`] (fallback): global lookup, row answers
//!
//! Both talk JSONP through the shared [`CallbackTransport`](crate::transport::CallbackTransport).
//! [`GeocodeResolver`] tries the primary, falls back to the secondary only
//! when the primary has nothing, and orders candidates with the POI-first
//! heuristic in [`rank`].

mod nominatim;
mod photon;
pub mod race;
pub mod rank;
mod resolver;

pub use nominatim::{NominatimProvider, DEFAULT_NOMINATIM_URL};
pub use photon::{PhotonProvider, DEFAULT_PHOTON_URL};
pub use race::first_settled;
pub use rank::{rank, score};
pub use resolver::{CandidateSource, GeocodeResolver};

use std::fmt;
use std::future::Future;

use thiserror::Error;

use crate::geo::Coordinate;
use crate::transport::TransportError;

/// Maximum candidates requested from a provider.
pub const PROVIDER_RESULT_LIMIT: usize = 8;

/// Which provider produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Photon,
    Nominatim,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Photon => "photon",
            ProviderId::Nominatim => "nominatim",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A place a free-text query may refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    pub coordinate: Coordinate,
    pub display_name: String,
    pub provenance: ProviderId,
    /// Semantic OSM key, e.g. `railway` or `amenity` (empty when unknown)
    pub class_key: String,
    /// Semantic OSM value, e.g. `station` (empty when unknown)
    pub class_value: String,
    /// Filled in by [`rank`]; zero until then
    pub rank_score: i32,
}

/// Errors from a single provider call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Payload did not have the provider's shape
    #[error("Malformed {provider} response: {reason}")]
    MalformedResponse { provider: ProviderId, reason: String },

    /// Configured base URL is unusable
    #[error("Invalid {provider} endpoint '{url}': {reason}")]
    InvalidEndpoint {
        provider: ProviderId,
        url: String,
        reason: String,
    },
}

/// A geocoding backend.
pub trait GeocodeProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Candidates for `text`, in the provider's own order.
    fn resolve(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<GeocodeCandidate>, GeocodeError>> + Send;
}

/// Build `base?k=v&...` with proper encoding.
pub(crate) fn endpoint_url(
    provider: ProviderId,
    base: &str,
    params: &[(&str, &str)],
) -> Result<String, GeocodeError> {
    url::Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| GeocodeError::InvalidEndpoint {
            provider,
            url: base.to_string(),
            reason: e.to_string(),
        })
}
