//! POI-first ranking.
//!
//! Transit stations beat ordinary POIs, which beat raw addresses:
//!
//! | rule                                                        | score |
//! |-------------------------------------------------------------|-------|
//! | `railway=station/stop/halt`, `railway=subway_entrance`, or `public_transport=*station*/*stop*` | +100 |
//! | display name mentions a station (`station`, 車站, 捷運, 地鐵, 高鐵, 火車) | +40 |
//! | key is `amenity`, `tourism`, `leisure` or `shop`            | +20   |
//! | key is `place`, `highway` or `boundary`                     | -10   |

use std::cmp::Reverse;
use std::sync::OnceLock;

use regex::Regex;

use super::GeocodeCandidate;

const POI_KEYS: [&str; 4] = ["amenity", "tourism", "leisure", "shop"];
const ADDRESS_KEYS: [&str; 3] = ["place", "highway", "boundary"];

fn station_text() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("station|車站|捷運|地鐵|高鐵|火車").expect("valid regex"))
}

fn is_rail_station(key: &str, value: &str) -> bool {
    key == "railway" && matches!(value, "station" | "stop" | "halt")
}

fn is_metro_or_transit(key: &str, value: &str) -> bool {
    (key == "railway" && value == "subway_entrance")
        || (key == "public_transport" && (value.contains("station") || value.contains("stop")))
}

/// Score one candidate. Higher is better.
pub fn score(candidate: &GeocodeCandidate) -> i32 {
    let key = candidate.class_key.as_str();
    let value = candidate.class_value.as_str();
    let mut s = 0;

    if is_rail_station(key, value) || is_metro_or_transit(key, value) {
        s += 100;
    }
    if station_text().is_match(&candidate.display_name.to_lowercase()) {
        s += 40;
    }
    if POI_KEYS.contains(&key) {
        s += 20;
    }
    if ADDRESS_KEYS.contains(&key) {
        s -= 10;
    }
    s
}

/// Score every candidate and order best first.
///
/// The sort is stable: equal scores keep the provider's order.
pub fn rank(mut candidates: Vec<GeocodeCandidate>) -> Vec<GeocodeCandidate> {
    for c in &mut candidates {
        c.rank_score = score(c);
    }
    candidates.sort_by_key(|c| Reverse(c.rank_score));
    candidates
}
