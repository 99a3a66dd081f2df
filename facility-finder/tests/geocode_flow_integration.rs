//! Place lookup through the facade: JSONP transport, Photon/Nominatim
//! fallback, ranking and the search-as-you-type session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};

use facility_finder::config::{ConfigFile, Language};
use facility_finder::geo::Coordinate;
use facility_finder::geocode::ProviderId;
use facility_finder::http::{AsyncHttpClient, HttpError};
use facility_finder::service::FacilityFinder;
use facility_finder::session::{SessionEvent, SessionState};

const PHOTON: &str = "https://photon.test/api/";
const NOMINATIM: &str = "https://nominatim.test/search";

// ============================================================================
// Test Helpers
// ============================================================================

/// A JSONP-speaking HTTP server per host.
///
/// Requests naming the host's callback parameter get `name(payload)`;
/// anything else gets the bare payload, which invokes nothing.
#[derive(Clone, Default)]
struct EchoJsonp {
    routes: Arc<Mutex<HashMap<String, (&'static str, Value)>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl EchoJsonp {
    fn route(self, host: &str, param: &'static str, payload: Value) -> Self {
        self.routes.lock().insert(host.to_string(), (param, payload));
        self
    }

    fn requests_to(&self, host: &str) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .filter(|u| u.contains(host))
            .cloned()
            .collect()
    }
}

impl AsyncHttpClient for EchoJsonp {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.requests.lock().push(url.to_string());
        let parsed = url::Url::parse(url).map_err(|e| HttpError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let host = parsed.host_str().unwrap_or_default().to_string();
        let Some((param, payload)) = self.routes.lock().get(&host).cloned() else {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: 404,
            });
        };
        let callback = parsed
            .query_pairs()
            .find(|(k, _)| k == param)
            .map(|(_, v)| v.into_owned());
        let body = match callback {
            Some(name) => format!("{}({});", name, payload),
            None => payload.to_string(),
        };
        Ok(body.into_bytes())
    }

    async fn post_form(&self, url: &str, _fields: &[(&str, &str)]) -> Result<Vec<u8>, HttpError> {
        Err(HttpError::Status {
            url: url.to_string(),
            status: 405,
        })
    }
}

fn config() -> ConfigFile {
    let mut config = ConfigFile::default();
    config.geocode.photon_url = PHOTON.to_string();
    config.geocode.nominatim_url = NOMINATIM.to_string();
    config.ui.language = Some(Language::English);
    config
}

fn photon_features() -> Value {
    json!({"features": [
        {
            "geometry": {"coordinates": [121.5170, 25.0478]},
            "properties": {"name": "Zhongxiao West Road", "city": "Taipei", "osm_key": "highway", "osm_value": "primary"}
        },
        {
            "geometry": {"coordinates": [121.5175, 25.0465]},
            "properties": {"name": "Taipei Main Station", "city": "Taipei", "osm_key": "railway", "osm_value": "station"}
        },
        {
            "geometry": {"coordinates": [121.5160, 25.0470]},
            "properties": {"name": "Q Square", "osm_key": "shop", "osm_value": "mall"}
        }
    ]})
}

fn nominatim_rows() -> Value {
    json!([
        {"lat": "25.0330", "lon": "121.5654", "display_name": "Xinyi District, Taipei", "class": "boundary", "type": "administrative"},
        {"lat": "25.0339", "lon": "121.5645", "display_name": "Taipei 101", "class": "tourism", "type": "attraction"}
    ])
}

fn center() -> Coordinate {
    Coordinate::new(25.0330, 121.5654).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_photon_answer_is_ranked() {
    let http = EchoJsonp::default()
        .route("photon.test", "callback", photon_features())
        .route("nominatim.test", "json_callback", nominatim_rows());
    let finder = FacilityFinder::with_http(config(), http.clone());

    let places = finder.geocode("taipei main").await;

    let names: Vec<&str> = places.iter().map(|p| p.display_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Taipei Main Station, Taipei",
            "Q Square",
            "Zhongxiao West Road, Taipei"
        ]
    );
    assert!(places.iter().all(|p| p.provenance == ProviderId::Photon));
    assert!(http.requests_to("nominatim.test").is_empty());

    let photon_url = &http.requests_to("photon.test")[0];
    assert!(photon_url.contains("lang=en"));
    assert!(photon_url.contains("limit=8"));
}

#[tokio::test]
async fn test_empty_photon_falls_back_to_nominatim() {
    let http = EchoJsonp::default()
        .route("photon.test", "callback", json!({"features": []}))
        .route("nominatim.test", "json_callback", nominatim_rows());
    let finder = FacilityFinder::with_http(config(), http.clone());

    let places = finder.geocode("101").await;

    assert_eq!(places.len(), 2);
    assert_eq!(places[0].display_name, "Taipei 101");
    assert_eq!(places[0].provenance, ProviderId::Nominatim);
    assert_eq!(places[1].rank_score, -10);
    // Both callback conventions are attempted.
    assert_eq!(http.requests_to("nominatim.test").len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_silent_photon_times_out_then_falls_back() {
    // Photon never calls back under the "jsonp" name it is sent.
    let http = EchoJsonp::default()
        .route("photon.test", "jsonp", photon_features())
        .route("nominatim.test", "callback", nominatim_rows());
    let finder = FacilityFinder::with_http(config(), http);

    let started = tokio::time::Instant::now();
    let places = finder.geocode("101").await;

    assert!(started.elapsed() >= Duration::from_millis(12_000));
    assert_eq!(places[0].display_name, "Taipei 101");
}

#[tokio::test]
async fn test_both_providers_down() {
    let finder = FacilityFinder::with_http(config(), EchoJsonp::default());
    assert!(finder.geocode("anything").await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_session_type_then_select() {
    let http = EchoJsonp::default()
        .route("photon.test", "callback", photon_features())
        .route("nominatim.test", "json_callback", nominatim_rows());
    let finder = FacilityFinder::with_http(config(), http.clone());
    let (session, mut events) = finder.start_session(center());

    session.on_text_changed("ta");
    session.on_text_changed("tai");
    session.on_text_changed("taipei");
    assert_eq!(session.state(), SessionState::Debouncing);

    let shown = match events.recv().await {
        Some(SessionEvent::Show(list)) => list,
        other => panic!("expected Show, got {:?}", other),
    };
    assert_eq!(shown.len(), 3);
    assert_eq!(shown[0].display_name, "Taipei Main Station, Taipei");
    assert_eq!(http.requests_to("photon.test").len(), 1, "debounced to one query");
    assert!(session.snapshot().list_visible);

    let picked = session.select_index(0).unwrap();
    assert_eq!(events.recv().await, Some(SessionEvent::Hide));
    assert_eq!(events.recv().await, Some(SessionEvent::Recenter(picked.clone())));
    assert_eq!(session.center(), picked.coordinate);
    assert!(!session.snapshot().list_visible);
}

#[tokio::test(start_paused = true)]
async fn test_session_short_input_never_queries() {
    let http = EchoJsonp::default().route("photon.test", "callback", photon_features());
    let finder = FacilityFinder::with_http(config(), http.clone());
    let (session, _events) = finder.start_session(center());

    session.on_text_changed("t");
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(http.requests.lock().is_empty());
    assert_eq!(session.state(), SessionState::Idle);
}
