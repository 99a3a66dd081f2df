//! Primary-then-fallback geocoding.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{rank, GeocodeCandidate, GeocodeProvider};

/// Anything that turns free text into ranked candidates.
///
/// The search session depends on this rather than on [`GeocodeResolver`]
/// so it can be driven by scripted sources in tests.
pub trait CandidateSource: Send + Sync + 'static {
    /// Ranked candidates for `text`. Never fails; problems yield an empty list.
    fn resolve_and_rank(&self, text: &str) -> impl Future<Output = Vec<GeocodeCandidate>> + Send;
}

/// Resolves text with `primary`, consulting `fallback` only when the
/// primary has nothing. Results from the two are never merged.
pub struct GeocodeResolver<A, B> {
    primary: A,
    fallback: B,
}

impl<A: GeocodeProvider, B: GeocodeProvider> GeocodeResolver<A, B> {
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &A {
        &self.primary
    }

    pub fn fallback(&self) -> &B {
        &self.fallback
    }

    /// Unranked candidates in provider order.
    pub async fn resolve(&self, text: &str) -> Vec<GeocodeCandidate> {
        match self.primary.resolve(text).await {
            Ok(candidates) if !candidates.is_empty() => return candidates,
            Ok(_) => debug!(
                query = text,
                provider = %self.primary.id(),
                "No candidates, trying fallback"
            ),
            Err(e) => warn!(
                query = text,
                provider = %self.primary.id(),
                error = %e,
                "Geocoder failed, trying fallback"
            ),
        }

        match self.fallback.resolve(text).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    query = text,
                    provider = %self.fallback.id(),
                    error = %e,
                    "Fallback geocoder failed"
                );
                Vec::new()
            }
        }
    }
}

impl<A, B> CandidateSource for GeocodeResolver<A, B>
where
    A: GeocodeProvider + 'static,
    B: GeocodeProvider + 'static,
{
    async fn resolve_and_rank(&self, text: &str) -> Vec<GeocodeCandidate> {
        rank(self.resolve(text).await)
    }
}

impl<T: CandidateSource> CandidateSource for Arc<T> {
    fn resolve_and_rank(&self, text: &str) -> impl Future<Output = Vec<GeocodeCandidate>> + Send {
        (**self).resolve_and_rank(text)
    }
}
