//! Category predicate table.
//!
//! Every searchable category is described by a static [`CategoryDefinition`]:
//! display metadata plus an ordered list of OSM tag filters. The same filters
//! drive both the Overpass query fragment and the classification of returned
//! features, so the two can never disagree.
//!
//! # Classification priority
//!
//! A feature whose tags satisfy several categories is attributed to the
//! first active category in table order:
//!
//! ```text
//! temple > grave > fuel > cafe > arcade
//! ```
//!
//! The current filters do not overlap, but once they do this order becomes
//! visible to users through the per-category counts.

mod query;

pub use query::{build_query, fragment};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::Language;

/// Identifier of a searchable category.
///
/// Variant order is the classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryKey {
    Temple,
    Grave,
    Fuel,
    InternetCafe,
    Arcade,
}

impl CategoryKey {
    /// Stable string key used on the command line and in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::Temple => "temple",
            CategoryKey::Grave => "grave",
            CategoryKey::Fuel => "fuel",
            CategoryKey::InternetCafe => "cafe",
            CategoryKey::Arcade => "arcade",
        }
    }

    /// All keys in priority order.
    pub fn all() -> [CategoryKey; 5] {
        [
            CategoryKey::Temple,
            CategoryKey::Grave,
            CategoryKey::Fuel,
            CategoryKey::InternetCafe,
            CategoryKey::Arcade,
        ]
    }

    /// Static definition for this key.
    pub fn definition(&self) -> &'static CategoryDefinition {
        match self {
            CategoryKey::Temple => &CATEGORIES[0],
            CategoryKey::Grave => &CATEGORIES[1],
            CategoryKey::Fuel => &CATEGORIES[2],
            CategoryKey::InternetCafe => &CATEGORIES[3],
            CategoryKey::Arcade => &CATEGORIES[4],
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category '{0}' (expected one of: temple, grave, fuel, cafe, arcade)")]
pub struct UnknownCategory(pub String);

impl FromStr for CategoryKey {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        CategoryKey::all()
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A single `key=value` OSM tag requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagFilter {
    pub key: &'static str,
    pub value: &'static str,
}

impl TagFilter {
    const fn new(key: &'static str, value: &'static str) -> Self {
        Self { key, value }
    }

    /// Whether the tag set carries exactly this key and value.
    pub fn matches(&self, tags: &BTreeMap<String, String>) -> bool {
        tags.get(self.key).is_some_and(|v| v == self.value)
    }
}

/// Display metadata and tag filters for one category.
#[derive(Debug)]
pub struct CategoryDefinition {
    pub key: CategoryKey,
    /// Traditional Chinese label
    pub label_zh: &'static str,
    /// English label
    pub label_en: &'static str,
    /// Marker color as a CSS hex string
    pub color: &'static str,
    /// Any filter matching is enough (logical OR)
    pub filters: &'static [TagFilter],
}

impl CategoryDefinition {
    /// Display label for the given language.
    pub fn label(&self, language: Language) -> &'static str {
        match language {
            Language::English => self.label_en,
            Language::TraditionalChinese => self.label_zh,
        }
    }

    /// Whether any of this category's filters matches the tags.
    pub fn matches(&self, tags: &BTreeMap<String, String>) -> bool {
        self.filters.iter().any(|f| f.matches(tags))
    }
}

/// The category table, in classification priority order.
pub static CATEGORIES: [CategoryDefinition; 5] = [
    CategoryDefinition {
        key: CategoryKey::Temple,
        label_zh: "宗教場所",
        label_en: "Places of worship",
        color: "#f59e0b",
        filters: &[TagFilter::new("amenity", "place_of_worship")],
    },
    CategoryDefinition {
        key: CategoryKey::Grave,
        label_zh: "墓地",
        label_en: "Cemeteries",
        color: "#ef4444",
        filters: &[
            TagFilter::new("landuse", "cemetery"),
            TagFilter::new("amenity", "grave_yard"),
        ],
    },
    CategoryDefinition {
        key: CategoryKey::Fuel,
        label_zh: "加油站",
        label_en: "Gas stations",
        color: "#10b981",
        filters: &[TagFilter::new("amenity", "fuel")],
    },
    CategoryDefinition {
        key: CategoryKey::InternetCafe,
        label_zh: "網咖",
        label_en: "Internet cafes",
        color: "#8b5cf6",
        filters: &[TagFilter::new("amenity", "internet_cafe")],
    },
    CategoryDefinition {
        key: CategoryKey::Arcade,
        label_zh: "電子遊樂場",
        label_en: "Amusement arcades",
        color: "#161ef9",
        filters: &[TagFilter::new("leisure", "amusement_arcade")],
    },
];

/// Attribute a tag set to at most one active category.
///
/// Scans the table in priority order, skipping inactive categories, and
/// returns the first match. Never yields more than one key.
pub fn classify(tags: &BTreeMap<String, String>, active: &[CategoryKey]) -> Option<CategoryKey> {
    CATEGORIES
        .iter()
        .filter(|def| active.contains(&def.key))
        .find(|def| def.matches(tags))
        .map(|def| def.key)
}
