//! Facility finder facade implementation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use super::error::ServiceError;
use crate::category::CategoryKey;
use crate::config::{ConfigFile, Language};
use crate::geo::Coordinate;
use crate::geocode::{
    CandidateSource, GeocodeCandidate, GeocodeResolver, NominatimProvider, PhotonProvider,
};
use crate::http::{AsyncHttpClient, AsyncReqwestClient};
use crate::session::{SearchSession, SessionConfig, SessionEvent};
use crate::spatial::{SpatialQueryEngine, SpatialQueryResult};
use crate::transport::{CallbackTransport, HttpScriptLoader};

/// Photon-then-Nominatim resolver over HTTP client `H`.
pub type LiveResolver<H> =
    GeocodeResolver<PhotonProvider<HttpScriptLoader<H>>, NominatimProvider<HttpScriptLoader<H>>>;

/// Everything a front end needs: POI search, place lookup and
/// search-as-you-type sessions, built from one [`ConfigFile`].
///
/// Both geocoders share a single callback transport, so callback names
/// are unique across every request the finder makes.
pub struct FacilityFinder<H = AsyncReqwestClient> {
    config: ConfigFile,
    language: Language,
    engine: SpatialQueryEngine<H>,
    resolver: Arc<LiveResolver<H>>,
}

impl FacilityFinder<AsyncReqwestClient> {
    /// Create a finder talking to the configured public services.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: ConfigFile) -> Result<Self, ServiceError> {
        let http = AsyncReqwestClient::with_timeout(config.overpass.request_timeout)?;
        Ok(Self::with_http(config, http))
    }
}

impl<H: AsyncHttpClient + Clone + 'static> FacilityFinder<H> {
    /// Create a finder over a caller-supplied HTTP client.
    pub fn with_http(config: ConfigFile, http: H) -> Self {
        let language = Language::detect(config.ui.language);

        let transport = Arc::new(CallbackTransport::with_timeout(
            HttpScriptLoader::new(http.clone()),
            Duration::from_millis(config.geocode.transport_timeout_ms),
        ));
        let photon = PhotonProvider::new(
            Arc::clone(&transport),
            config.geocode.photon_url.as_str(),
            language.photon_hint(),
        );
        let nominatim = NominatimProvider::new(transport, config.geocode.nominatim_url.as_str());
        let engine = SpatialQueryEngine::new(http, config.overpass.endpoints.clone());

        info!(
            language = %language,
            endpoints = config.overpass.endpoints.len(),
            "Facility finder ready"
        );

        Self {
            config,
            language,
            engine,
            resolver: Arc::new(GeocodeResolver::new(photon, nominatim)),
        }
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Effective interface language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// The configured initial map center.
    pub fn default_center(&self) -> Result<Coordinate, ServiceError> {
        Ok(Coordinate::new(
            self.config.map.default_lat,
            self.config.map.default_lon,
        )?)
    }

    /// Search for POIs around `center`; `radius_m` defaults to the
    /// configured radius.
    pub async fn search(
        &self,
        center: Coordinate,
        radius_m: Option<f64>,
        categories: &[CategoryKey],
    ) -> Result<SpatialQueryResult, ServiceError> {
        let radius = radius_m.unwrap_or(self.config.map.default_radius);
        Ok(self.engine.search(center, radius, categories).await?)
    }

    /// Ranked place candidates for `text`, at most `max_results` of them.
    pub async fn geocode(&self, text: &str) -> Vec<GeocodeCandidate> {
        let mut candidates = self.resolver.resolve_and_rank(text).await;
        candidates.truncate(self.config.search.max_results);
        candidates
    }

    /// Start a search-as-you-type session centered on `center`.
    pub fn start_session(
        &self,
        center: Coordinate,
    ) -> (
        SearchSession<Arc<LiveResolver<H>>>,
        UnboundedReceiver<SessionEvent>,
    ) {
        SearchSession::new(
            Arc::clone(&self.resolver),
            SessionConfig::from(&self.config.search),
            center,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockAsyncHttpClient;
    use crate::spatial::SpatialError;

    const OVERPASS: &str = "https://overpass.test/api/interpreter";

    fn config() -> ConfigFile {
        let mut config = ConfigFile::default();
        config.overpass.endpoints = vec![OVERPASS.to_string()];
        config.map.default_lat = 25.0330;
        config.map.default_lon = 121.5654;
        config.ui.language = Some(Language::English);
        config
    }

    #[tokio::test]
    async fn test_search_uses_configured_radius() {
        // ~300 m north of the center.
        let body = r#"{"elements":[{"type":"node","id":1,"lat":25.0357,"lon":121.5654,"tags":{"amenity":"fuel"}}]}"#;
        let http = MockAsyncHttpClient::new().with_response(OVERPASS, body);
        let finder = FacilityFinder::with_http(config(), http.clone());

        let center = finder.default_center().unwrap();
        let result = finder.search(center, None, &[CategoryKey::Fuel]).await.unwrap();
        assert_eq!(result.counts[&CategoryKey::Fuel], 1);

        let result = finder
            .search(center, Some(100.0), &[CategoryKey::Fuel])
            .await
            .unwrap();
        assert_eq!(result.counts[&CategoryKey::Fuel], 0);

        let query = &http.calls()[1].fields[0].1;
        assert!(query.contains("around:100,"));
    }

    #[tokio::test]
    async fn test_search_error_surfaces() {
        let finder = FacilityFinder::with_http(config(), MockAsyncHttpClient::new());
        let center = finder.default_center().unwrap();

        let err = finder.search(center, None, &[CategoryKey::Fuel]).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Spatial(SpatialError::AllEndpointsExhausted { attempts: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_configured_center() {
        let mut config = config();
        config.map.default_lat = 123.0;
        let finder = FacilityFinder::with_http(config, MockAsyncHttpClient::new());
        assert!(matches!(
            finder.default_center(),
            Err(ServiceError::InvalidCenter(_))
        ));
    }

    #[test]
    fn test_stored_language_preference() {
        let finder = FacilityFinder::with_http(config(), MockAsyncHttpClient::new());
        assert_eq!(finder.language(), Language::English);
    }
}
