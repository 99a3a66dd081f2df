//! One-shot place lookup.

use super::common::format_candidate;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Resolve `words` (joined with spaces) and print the ranked candidates.
pub async fn run(runner: &CliRunner, words: Vec<String>) -> Result<(), CliError> {
    let text = words.join(" ");
    if text.trim().is_empty() {
        return Err(CliError::InvalidArgument("Nothing to look up".to_string()));
    }

    runner.log_startup("geocode");
    let finder = runner.create_finder()?;
    let candidates = finder.geocode(&text).await;

    if candidates.is_empty() {
        println!("No places found for '{}'.", text);
        return Ok(());
    }
    for (i, candidate) in candidates.iter().enumerate() {
        println!("{}", format_candidate(i + 1, candidate, false));
    }
    Ok(())
}
