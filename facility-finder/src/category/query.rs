//! Overpass QL construction from the category table.

use super::CategoryKey;
use crate::geo::Coordinate;

/// Server-side timeout requested in the query header, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 25;

/// OSM element kinds covered by every filter. Ways and relations come back
/// with a `center` because of the `out center` footer.
const ELEMENT_KINDS: [&str; 3] = ["node", "way", "relation"];

/// Build the union block for one category.
///
/// Each tag filter expands to one statement per element kind, all sharing
/// the same `around` clause.
pub fn fragment(key: CategoryKey, center: Coordinate, radius_m: f64) -> String {
    let around = format!(
        "(around:{},{},{})",
        radius_m,
        center.latitude(),
        center.longitude()
    );

    let mut out = String::from("  (\n");
    for filter in key.definition().filters {
        for kind in ELEMENT_KINDS {
            out.push_str(&format!(
                "    {}[\"{}\"=\"{}\"]{};\n",
                kind, filter.key, filter.value, around
            ));
        }
    }
    out.push_str("  );\n");
    out
}

/// Build the complete Overpass query for the active categories.
///
/// Category blocks are combined with a union (logical OR) in the caller's
/// order. Pure string construction.
pub fn build_query(center: Coordinate, radius_m: f64, active: &[CategoryKey]) -> String {
    let mut query = format!("[out:json][timeout:{}];\n(\n", QUERY_TIMEOUT_SECS);
    for key in active {
        query.push_str(&fragment(*key, center, radius_m));
    }
    query.push_str(");\nout center tags;");
    query
}
