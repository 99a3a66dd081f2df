//! Facility search around a point.

use clap::Args;

use facility_finder::category::CategoryKey;
use facility_finder::config::Language;
use facility_finder::spatial::SpatialQueryResult;

use super::common::{categories_or_all, format_distance, parse_category, resolve_center};
use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Latitude of the search center (default: map.default_lat)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the search center (default: map.default_lon)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Search radius in meters (default: map.default_radius)
    #[arg(long)]
    pub radius: Option<f64>,

    /// Category to search for; repeat for several (default: all)
    #[arg(long = "category", short = 'c', value_parser = parse_category)]
    pub categories: Vec<CategoryKey>,
}

/// Run the search command.
pub async fn run(runner: &CliRunner, args: SearchArgs) -> Result<(), CliError> {
    runner.log_startup("search");
    let finder = runner.create_finder()?;
    let center = resolve_center(&finder, args.lat, args.lon)?;
    let categories = categories_or_all(&args.categories);
    let radius = args.radius.unwrap_or(runner.config().map.default_radius);

    println!("Searching {} around {}...", format_distance(radius), center);
    let result = finder.search(center, Some(radius), &categories).await?;
    print_result(&result, finder.language());
    Ok(())
}

/// Print per-category counts followed by the hits, nearest first.
pub fn print_result(result: &SpatialQueryResult, language: Language) {
    println!("Source: {}", result.endpoint);
    println!();

    for (key, count) in &result.counts {
        println!("  {:<14} {:>3}", key.definition().label(language), count);
    }
    println!();

    if result.hits.is_empty() {
        println!("Nothing found within the radius.");
        return;
    }

    for hit in &result.hits {
        let feature = &hit.feature;
        let label = hit
            .category
            .map(|k| k.definition().label(language))
            .unwrap_or("-");
        println!(
            "{:>9}  {}  {}  [{}]",
            format_distance(hit.distance_m),
            label,
            feature.name().unwrap_or("(unnamed)"),
            feature.primary_tag().unwrap_or("-"),
        );
        println!("           {}  {}", feature.coordinate, feature.osm_url());
    }
}
