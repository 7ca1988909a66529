//! Price-history configuration parsing from environment variables.

use super::{EnvLookup, parse_or};

#[derive(Debug, Clone)]
pub struct HistoryEnvConfig {
    /// Empty means "no Price API": history is simulated.
    pub api_key: String,
    pub api_url: Option<String>,
    /// How many clean rows, in scrape order, get a history lookup.
    pub sample_size: usize,
    pub days: usize,
    /// Consecutive API failures before the rest of a run is simulated.
    pub failure_threshold: usize,
}

impl Default for HistoryEnvConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: None,
            sample_size: 20,
            days: 7,
            failure_threshold: 3,
        }
    }
}

impl HistoryEnvConfig {
    pub fn from_lookup(lookup: &EnvLookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: lookup("PRICE_API_KEY").unwrap_or_default(),
            api_url: lookup("PRICE_API_URL"),
            sample_size: parse_or(lookup, "HISTORY_SAMPLE_SIZE", defaults.sample_size),
            // At least two days are needed for a 24h change
            days: parse_or(lookup, "HISTORY_DAYS", defaults.days).max(2),
            failure_threshold: parse_or(
                lookup,
                "HISTORY_FAILURE_THRESHOLD",
                defaults.failure_threshold,
            ),
        }
    }

    /// True when both a key and an endpoint are configured.
    pub fn use_live_api(&self) -> bool {
        !self.api_key.is_empty() && self.api_url.is_some()
    }
}
