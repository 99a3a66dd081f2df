//! Overpass response parsing.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::geo::Coordinate;

/// OSM element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
            ElementKind::Relation => "relation",
        }
    }

    /// Ways and relations are areas, plotted at their centroid.
    pub fn is_area(&self) -> bool {
        !matches!(self, ElementKind::Node)
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "node" => Some(ElementKind::Node),
            "way" => Some(ElementKind::Way),
            "relation" => Some(ElementKind::Relation),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plottable OSM feature.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFeature {
    pub id: i64,
    pub kind: ElementKind,
    pub coordinate: Coordinate,
    pub tags: BTreeMap<String, String>,
}

impl SpatialFeature {
    /// The `name` tag, if any.
    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }

    /// First present of `amenity`, `landuse`, `leisure`.
    pub fn primary_tag(&self) -> Option<&str> {
        ["amenity", "landuse", "leisure"]
            .iter()
            .find_map(|k| self.tags.get(*k))
            .map(String::as_str)
    }

    /// Link to the element on openstreetmap.org.
    pub fn osm_url(&self) -> String {
        format!("https://www.openstreetmap.org/{}/{}", self.kind, self.id)
    }
}

#[derive(Debug, Deserialize)]
struct RawCenter {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<RawCenter>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

/// Top level of an Overpass JSON answer. Only `elements` is used.
#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Value>,
}

impl OverpassResponse {
    /// Normalize every usable element into a feature.
    ///
    /// Elements are dropped, not reported, when they are malformed, of an
    /// unknown type, or have no coordinate to plot.
    pub(crate) fn into_features(self) -> Vec<SpatialFeature> {
        self.elements
            .into_iter()
            .filter_map(|v| serde_json::from_value::<RawElement>(v).ok())
            .filter_map(normalize)
            .collect()
    }
}

fn normalize(raw: RawElement) -> Option<SpatialFeature> {
    let kind = ElementKind::parse(&raw.kind)?;

    let own = raw.lat.zip(raw.lon);
    let (lat, lon) = if kind.is_area() {
        raw.center.map(|c| (c.lat, c.lon)).or(own)?
    } else {
        own?
    };

    let coordinate = Coordinate::new(lat, lon).ok()?;
    Some(SpatialFeature {
        id: raw.id,
        kind,
        coordinate,
        tags: raw.tags,
    })
}
