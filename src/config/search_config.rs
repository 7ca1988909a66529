//! Shopping-search configuration parsing from environment variables.

use super::{EnvLookup, parse_or};

pub const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com/search";
pub const DEFAULT_PRODUCT_QUERY: &str = "gold chain for men";

/// Search provider environment configuration
#[derive(Debug, Clone)]
pub struct SearchEnvConfig {
    pub api_key: String,
    pub base_url: String,
    /// Google country code (`gl`)
    pub country: String,
    /// Google interface language (`hl`)
    pub language: String,
    pub num_results: usize,
    pub default_query: String,
}

impl Default for SearchEnvConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_SERPAPI_URL.to_string(),
            country: "in".to_string(),
            language: "en".to_string(),
            num_results: 100,
            default_query: DEFAULT_PRODUCT_QUERY.to_string(),
        }
    }
}

impl SearchEnvConfig {
    pub fn from_lookup(lookup: &EnvLookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: lookup("SERPAPI_API_KEY").unwrap_or_default(),
            base_url: lookup("SERPAPI_BASE_URL").unwrap_or(defaults.base_url),
            country: lookup("SEARCH_COUNTRY").unwrap_or(defaults.country),
            language: lookup("SEARCH_LANGUAGE").unwrap_or(defaults.language),
            num_results: parse_or(lookup, "SEARCH_NUM_RESULTS", defaults.num_results),
            default_query: lookup("DEFAULT_PRODUCT_QUERY").unwrap_or(defaults.default_query),
        }
    }
}
