//! Interface language.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    TraditionalChinese,
    English,
}

/// Error for a language code with no known alias.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown language '{0}' (expected zh-Hant or en)")]
pub struct UnknownLanguage(pub String);

impl Language {
    /// Canonical code, as stored in config.ini.
    pub fn code(&self) -> &'static str {
        match self {
            Language::TraditionalChinese => "zh-Hant",
            Language::English => "en",
        }
    }

    /// Value for Photon's `lang` parameter.
    pub fn photon_hint(&self) -> &'static str {
        match self {
            Language::TraditionalChinese => "zh",
            Language::English => "en",
        }
    }

    /// Map a locale string such as `en_US.UTF-8` onto a language.
    ///
    /// Anything starting with `en` is English; everything else, including
    /// an unset locale, falls back to Traditional Chinese.
    pub fn from_locale(locale: Option<&str>) -> Self {
        match locale {
            Some(l) if l.trim().to_ascii_lowercase().starts_with("en") => Language::English,
            _ => Language::TraditionalChinese,
        }
    }

    /// Effective language: the stored preference when present, otherwise
    /// derived from the `LANG` environment variable.
    pub fn detect(stored: Option<Language>) -> Self {
        stored.unwrap_or_else(|| Self::from_locale(std::env::var("LANG").ok().as_deref()))
    }

    pub fn all() -> [Language; 2] {
        [Language::TraditionalChinese, Language::English]
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "zh" | "zh-tw" | "zh-hant" => Ok(Language::TraditionalChinese),
            "en" | "en-us" => Ok(Language::English),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
