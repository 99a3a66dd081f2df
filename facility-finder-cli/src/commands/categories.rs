//! Category listing.

use facility_finder::category::CATEGORIES;
use facility_finder::config::{ConfigFile, Language};

/// Print every category with its label, marker color and OSM filters.
pub fn run() {
    let config = ConfigFile::load().unwrap_or_default();
    let language = Language::detect(config.ui.language);

    for def in &CATEGORIES {
        let filters: Vec<String> = def
            .filters
            .iter()
            .map(|f| format!("{}={}", f.key, f.value))
            .collect();
        println!(
            "{:<8} {:<14} {}  {}",
            def.key.as_str(),
            def.label(language),
            def.color,
            filters.join(", ")
        );
    }
}
