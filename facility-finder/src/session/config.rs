use std::time::Duration;

use crate::config::{
    SearchSettings, DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_RESULTS, DEFAULT_MIN_QUERY_CHARS,
};

/// Tuning for a [`SearchSession`](super::SearchSession).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Quiet period after the last edit before a query starts (default: 220ms)
    pub debounce: Duration,
    /// Trimmed input shorter than this, in characters, clears the list (default: 2)
    pub min_query_chars: usize,
    /// Results kept from each answer (default: 8)
    pub max_results: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl From<&SearchSettings> for SessionConfig {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            debounce: Duration::from_millis(settings.debounce_ms),
            min_query_chars: settings.min_query_chars,
            max_results: settings.max_results,
        }
    }
}
