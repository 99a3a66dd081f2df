//! facility-finder - command-line front end
//!
//! Finds temples, cemeteries, gas stations, internet cafes and arcades
//! near a point, and looks up places by name.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::interactive::InteractiveArgs;
use commands::search::SearchArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "facility-finder")]
#[command(version = facility_finder::VERSION)]
#[command(about = "Find nearby facilities on OpenStreetMap", long_about = None)]
struct Cli {
    /// Also print log events to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find facilities around a point
    Search(SearchArgs),

    /// Look up a place by name
    Geocode {
        /// Place name, e.g. "台北車站" or "Taipei 101"
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Search-as-you-type session reading lines from stdin
    Interactive(InteractiveArgs),

    /// List the searchable categories
    Categories,

    /// Show the interface language, or store a new preference
    Lang {
        /// Language code: zh-Hant or en
        code: Option<String>,
    },

    /// View or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Search(args) => {
            let runner = CliRunner::new(cli.verbose)?;
            commands::search::run(&runner, args).await
        }
        Commands::Geocode { text } => {
            let runner = CliRunner::new(cli.verbose)?;
            commands::geocode::run(&runner, text).await
        }
        Commands::Interactive(args) => {
            let runner = CliRunner::new(cli.verbose)?;
            commands::interactive::run(&runner, args).await
        }
        Commands::Categories => {
            commands::categories::run();
            Ok(())
        }
        Commands::Lang { code } => commands::lang::run(code),
        Commands::Config { command } => commands::config::run(command),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli).await {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use facility_finder::category::CategoryKey;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_arguments() {
        let cli = Cli::try_parse_from([
            "facility-finder",
            "search",
            "--lat",
            "-33.86",
            "--lon",
            "151.21",
            "--radius",
            "800",
            "-c",
            "fuel",
            "--category",
            "temple",
        ])
        .unwrap();

        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.lat, Some(-33.86));
                assert_eq!(args.radius, Some(800.0));
                assert_eq!(args.categories, vec![CategoryKey::Fuel, CategoryKey::Temple]);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["facility-finder", "search", "-c", "bakery"]).is_err());
    }

    #[test]
    fn test_geocode_joins_words() {
        let cli = Cli::try_parse_from(["facility-finder", "geocode", "Taipei", "101"]).unwrap();
        match cli.command {
            Commands::Geocode { text } => assert_eq!(text, vec!["Taipei", "101"]),
            _ => panic!("expected geocode"),
        }
    }
}
