//! Spatial POI query engine.
//!
//! Turns a center, a radius and a set of categories into an Overpass query,
//! submits it to a fixed, ordered list of equivalent endpoints until one
//! answers, and post-processes the answer:
//!
//! 1. normalize elements into [`SpatialFeature`]s (areas at their centroid)
//! 2. keep only features within the exact radius (`distance <= radius`)
//! 3. classify each feature against the active categories
//! 4. count per category and order by distance
//!
//! The radius filter is not optional: `around` matches areas by geometry,
//! so an area touching the circle can have its centroid outside it.
//!
//! The engine is stateless. Endpoint rotation is the only resilience
//! mechanism; a failing endpoint is never retried within one search.

mod element;

pub use element::{ElementKind, SpatialFeature};

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::category::{build_query, classify, CategoryKey};
use crate::geo::{distance_m, Coordinate};
use crate::http::AsyncHttpClient;
use element::OverpassResponse;

/// Public Overpass instances, in priority order.
pub const DEFAULT_OVERPASS_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://overpass.openstreetmap.ru/api/interpreter",
];

/// Errors surfaced by [`SpatialQueryEngine::search`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    /// Nothing to search for
    #[error("At least one category must be selected")]
    NoCategories,

    /// Radius must be a positive, finite number of meters
    #[error("Invalid radius: {0} (must be a positive number of meters)")]
    InvalidRadius(f64),

    /// Every endpoint failed or timed out
    #[error("All {attempts} Overpass endpoints failed (last error: {last_error})")]
    AllEndpointsExhausted { attempts: usize, last_error: String },
}

/// A feature within the search radius.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureHit {
    pub feature: SpatialFeature,
    /// Active category the feature was attributed to, if any
    pub category: Option<CategoryKey>,
    /// Great-circle distance from the search center in meters
    pub distance_m: f64,
}

/// Outcome of one spatial search.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialQueryResult {
    /// Features within the radius, nearest first
    pub hits: Vec<FeatureHit>,
    /// Classified hits per active category; every active key is present
    pub counts: BTreeMap<CategoryKey, usize>,
    /// Endpoint that produced the answer
    pub endpoint: String,
}

impl SpatialQueryResult {
    /// Hits attributed to `key`.
    pub fn hits_for(&self, key: CategoryKey) -> impl Iterator<Item = &FeatureHit> {
        self.hits.iter().filter(move |h| h.category == Some(key))
    }
}

/// Apply the radius filter, classification, counting and ordering.
///
/// Pure; the network half of the search lives in [`SpatialQueryEngine`].
pub fn filter_and_classify(
    center: Coordinate,
    radius_m: f64,
    features: Vec<SpatialFeature>,
    active: &[CategoryKey],
) -> (Vec<FeatureHit>, BTreeMap<CategoryKey, usize>) {
    let mut counts: BTreeMap<CategoryKey, usize> = active.iter().map(|k| (*k, 0)).collect();

    let mut hits: Vec<FeatureHit> = features
        .into_iter()
        .filter_map(|feature| {
            let distance = distance_m(center, feature.coordinate);
            (distance <= radius_m).then(|| {
                let category = classify(&feature.tags, active);
                FeatureHit {
                    feature,
                    category,
                    distance_m: distance,
                }
            })
        })
        .collect();

    for hit in &hits {
        if let Some(key) = hit.category {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    hits.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    (hits, counts)
}

/// Overpass client with endpoint rotation.
pub struct SpatialQueryEngine<H> {
    http: H,
    endpoints: Vec<String>,
}

impl<H: AsyncHttpClient> SpatialQueryEngine<H> {
    /// Creates an engine trying `endpoints` in the given order.
    pub fn new(http: H, endpoints: Vec<String>) -> Self {
        Self { http, endpoints }
    }

    /// Creates an engine using [`DEFAULT_OVERPASS_ENDPOINTS`].
    pub fn with_default_endpoints(http: H) -> Self {
        Self::new(
            http,
            DEFAULT_OVERPASS_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Search for features of the active categories around `center`.
    ///
    /// Duplicate keys in `active` are ignored.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::NoCategories`] if `active` is empty
    /// - [`SpatialError::InvalidRadius`] for a non-positive or non-finite radius
    /// - [`SpatialError::AllEndpointsExhausted`] if no endpoint answered
    pub async fn search(
        &self,
        center: Coordinate,
        radius_m: f64,
        active: &[CategoryKey],
    ) -> Result<SpatialQueryResult, SpatialError> {
        if active.is_empty() {
            return Err(SpatialError::NoCategories);
        }
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(SpatialError::InvalidRadius(radius_m));
        }

        let mut keys: Vec<CategoryKey> = Vec::with_capacity(active.len());
        for key in active {
            if !keys.contains(key) {
                keys.push(*key);
            }
        }

        let query = build_query(center, radius_m, &keys);
        let (endpoint, response) = self.fetch(&query).await?;

        let features = response.into_features();
        let returned = features.len();
        let (hits, counts) = filter_and_classify(center, radius_m, features, &keys);

        info!(
            endpoint = %endpoint,
            center = %center,
            radius_m = radius_m,
            returned = returned,
            within_radius = hits.len(),
            "Spatial search complete"
        );

        Ok(SpatialQueryResult {
            hits,
            counts,
            endpoint,
        })
    }

    /// Submit the query to each endpoint in turn; first parseable answer wins.
    async fn fetch(&self, query: &str) -> Result<(String, OverpassResponse), SpatialError> {
        let mut last_error = String::from("no endpoints configured");

        for endpoint in &self.endpoints {
            debug!(endpoint = %endpoint, "Submitting Overpass query");

            let body = match self.http.post_form(endpoint, &[("data", query)]).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Overpass endpoint failed");
                    last_error = e.to_string();
                    continue;
                }
            };

            match serde_json::from_slice::<OverpassResponse>(&body) {
                Ok(response) => return Ok((endpoint.clone(), response)),
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Overpass answer is not valid JSON");
                    last_error = format!("invalid JSON from {}: {}", endpoint, e);
                }
            }
        }

        Err(SpatialError::AllEndpointsExhausted {
            attempts: self.endpoints.len(),
            last_error,
        })
    }
}
