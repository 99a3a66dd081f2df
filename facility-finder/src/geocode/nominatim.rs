//! Nominatim geocoder (fallback provider).
//!
//! Always searches globally: no viewbox or `bounded` parameter is ever sent.
//! Nominatim documents `json_callback` as its JSONP parameter, but mirrors
//! and proxies differ, so every lookup asks with both `callback` and
//! `json_callback` and takes whichever settles first.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::race::first_settled;
use super::{endpoint_url, GeocodeCandidate, GeocodeError, GeocodeProvider, ProviderId};
use crate::geo::Coordinate;
use crate::transport::{CallbackTransport, ScriptLoader, TransportError};

/// Public Nominatim search endpoint.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Callback parameter names raced against each other.
const CALLBACK_PARAMS: [&str; 2] = ["callback", "json_callback"];

/// Nominatim client over the callback transport.
pub struct NominatimProvider<L> {
    transport: Arc<CallbackTransport<L>>,
    base_url: String,
}

impl<L: ScriptLoader> NominatimProvider<L> {
    pub fn new(transport: Arc<CallbackTransport<L>>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }
}

impl<L: ScriptLoader> GeocodeProvider for NominatimProvider<L> {
    fn id(&self) -> ProviderId {
        ProviderId::Nominatim
    }

    async fn resolve(&self, text: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let limit = super::PROVIDER_RESULT_LIMIT.to_string();
        let url = endpoint_url(
            ProviderId::Nominatim,
            &self.base_url,
            &[
                ("format", "jsonv2"),
                ("addressdetails", "0"),
                ("namedetails", "0"),
                ("limit", &limit),
                ("q", text),
            ],
        )?;

        let requests = CALLBACK_PARAMS
            .iter()
            .map(|param| self.transport.request(&url, param))
            .collect();
        let payload = first_settled(requests)
            .await
            .unwrap_or_else(|| Err(TransportError::Failed("no callback convention".to_string())))?;

        let candidates = parse_rows(payload)?;
        debug!(query = text, candidates = candidates.len(), "Nominatim answered");
        Ok(candidates)
    }
}

/// Coerce a JSON string or number into a float.
fn coerce_f64(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn str_field(row: &Value, key: &str) -> Option<String> {
    row.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Convert Nominatim rows into candidates. Rows with unusable coordinates
/// are skipped.
fn parse_rows(payload: Value) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
    let Value::Array(rows) = payload else {
        return Err(GeocodeError::MalformedResponse {
            provider: ProviderId::Nominatim,
            reason: "expected an array of places".to_string(),
        });
    };

    Ok(rows
        .iter()
        .filter_map(|row| {
            let lat = coerce_f64(row.get("lat"))?;
            let lon = coerce_f64(row.get("lon"))?;
            let coordinate = Coordinate::new(lat, lon).ok()?;
            Some(GeocodeCandidate {
                coordinate,
                display_name: str_field(row, "display_name")
                    .or_else(|| str_field(row, "name"))
                    .unwrap_or_default(),
                provenance: ProviderId::Nominatim,
                class_key: str_field(row, "class").unwrap_or_default(),
                class_value: str_field(row, "type").unwrap_or_default(),
                rank_score: 0,
            })
        })
        .collect())
}
