//! Interface language preference.

use facility_finder::config::{config_file_path, ConfigFile, Language};

use crate::error::CliError;

/// Show the effective language, or store `code` as the preference.
pub fn run(code: Option<String>) -> Result<(), CliError> {
    let mut config = ConfigFile::load()?;

    match code {
        None => {
            let effective = Language::detect(config.ui.language);
            let source = if config.ui.language.is_some() {
                "stored preference"
            } else {
                "from LANG"
            };
            println!("{} ({})", effective, source);
        }
        Some(code) => {
            let language: Language = code
                .parse()
                .map_err(|e: facility_finder::config::UnknownLanguage| {
                    CliError::InvalidArgument(e.to_string())
                })?;
            config.ui.language = Some(language);
            config.save()?;
            println!("Language set to {} in {}", language, config_file_path().display());
        }
    }
    Ok(())
}
