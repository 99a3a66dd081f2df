//! Photon geocoder (primary provider).

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{endpoint_url, GeocodeCandidate, GeocodeError, GeocodeProvider, ProviderId};
use crate::geo::Coordinate;
use crate::transport::{CallbackTransport, ScriptLoader};

/// Public Photon search endpoint.
pub const DEFAULT_PHOTON_URL: &str = "https://photon.komoot.io/api/";

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Properties {
    name: Option<String>,
    street: Option<String>,
    city: Option<String>,
    country: Option<String>,
    osm_key: Option<String>,
    osm_value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Properties,
}

/// Photon client over the callback transport.
pub struct PhotonProvider<L> {
    transport: Arc<CallbackTransport<L>>,
    base_url: String,
    language: String,
}

impl<L: ScriptLoader> PhotonProvider<L> {
    /// `language` is Photon's `lang` hint, e.g. `en` or `zh`.
    pub fn new(transport: Arc<CallbackTransport<L>>, base_url: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            language: language.into(),
        }
    }
}

impl<L: ScriptLoader> GeocodeProvider for PhotonProvider<L> {
    fn id(&self) -> ProviderId {
        ProviderId::Photon
    }

    async fn resolve(&self, text: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let limit = super::PROVIDER_RESULT_LIMIT.to_string();
        let url = endpoint_url(
            ProviderId::Photon,
            &self.base_url,
            &[("q", text), ("limit", &limit), ("lang", &self.language)],
        )?;

        let payload = self.transport.request(&url, "callback").await?;
        let candidates = parse_features(payload)?;
        debug!(query = text, candidates = candidates.len(), "Photon answered");
        Ok(candidates)
    }
}

/// Convert a Photon FeatureCollection into candidates.
///
/// A bare array (an empty JSONP payload) yields no candidates. Features
/// without a usable `[lon, lat]` pair are skipped.
fn parse_features(payload: Value) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
    let features = match payload {
        Value::Object(mut map) => match map.remove("features") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(GeocodeError::MalformedResponse {
                    provider: ProviderId::Photon,
                    reason: format!("'features' is not an array: {}", other),
                })
            }
        },
        Value::Array(_) => Vec::new(),
        other => {
            return Err(GeocodeError::MalformedResponse {
                provider: ProviderId::Photon,
                reason: format!("expected a FeatureCollection, got {}", other),
            })
        }
    };

    Ok(features
        .into_iter()
        .filter_map(|v| serde_json::from_value::<Feature>(v).ok())
        .filter_map(to_candidate)
        .collect())
}

fn to_candidate(feature: Feature) -> Option<GeocodeCandidate> {
    let (lon, lat) = match feature.geometry.coordinates.as_slice() {
        [lon, lat, ..] => (*lon, *lat),
        _ => return None,
    };
    let coordinate = Coordinate::new(lat, lon).ok()?;

    let p = feature.properties;
    let display_name = [&p.name, &p.street, &p.city, &p.country]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    Some(GeocodeCandidate {
        coordinate,
        display_name,
        provenance: ProviderId::Photon,
        class_key: p.osm_key.unwrap_or_default(),
        class_value: p.osm_value.unwrap_or_default(),
        rank_score: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::testing::FakeJsonpServer;
    use serde_json::json;

    fn provider(server: FakeJsonpServer) -> PhotonProvider<FakeJsonpServer> {
        let transport = Arc::new(CallbackTransport::new(server));
        PhotonProvider::new(transport, DEFAULT_PHOTON_URL, "zh")
    }

    #[tokio::test]
    async fn test_maps_features() {
        let server = FakeJsonpServer::new(
            "callback",
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "geometry": {"type": "Point", "coordinates": [121.5170, 25.0478]},
                    "properties": {
                        "name": "Taipei Main Station",
                        "street": "",
                        "city": "Taipei",
                        "country": "Taiwan",
                        "osm_key": "railway",
                        "osm_value": "station"
                    }
                }]
            }),
        );
        let urls = server.urls.clone();

        let candidates = provider(server).resolve("taipei main").await.unwrap();

        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.display_name, "Taipei Main Station, Taipei, Taiwan");
        assert_eq!(c.coordinate.latitude(), 25.0478);
        assert_eq!(c.coordinate.longitude(), 121.5170);
        assert_eq!(c.provenance, ProviderId::Photon);
        assert_eq!((c.class_key.as_str(), c.class_value.as_str()), ("railway", "station"));

        let url = urls.lock()[0].clone();
        assert!(url.starts_with("https://photon.komoot.io/api/?q=taipei+main&limit=8&lang=zh&callback=__cb_"));
    }

    #[tokio::test]
    async fn test_missing_properties_and_bad_geometry() {
        let server = FakeJsonpServer::new(
            "callback",
            json!({"features": [
                {"geometry": {"coordinates": [10.0, 50.0]}},
                {"geometry": {"coordinates": [10.0]}, "properties": {"name": "short"}},
                {"geometry": {"coordinates": [10.0, 95.0]}, "properties": {"name": "off"}},
                {"properties": {"name": "no geometry"}}
            ]}),
        );

        let candidates = provider(server).resolve("x").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].display_name, "");
        assert_eq!(candidates[0].class_key, "");
    }

    #[tokio::test]
    async fn test_empty_payload_is_no_candidates() {
        let candidates = provider(FakeJsonpServer::new("callback", json!(null)))
            .resolve("x")
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_malformed() {
        let err = provider(FakeJsonpServer::new("callback", json!("oops")))
            .resolve("x")
            .await
            .unwrap_err();
        assert!(matches!(err, GeocodeError::MalformedResponse { provider: ProviderId::Photon, .. }));
    }

    #[tokio::test]
    async fn test_invalid_base_url() {
        let transport = Arc::new(CallbackTransport::new(FakeJsonpServer::new("callback", json!([]))));
        let provider = PhotonProvider::new(transport, "not a url", "en");
        let err = provider.resolve("x").await.unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidEndpoint { .. }));
    }
}
