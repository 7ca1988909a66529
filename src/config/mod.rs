//! Configuration module for dealscout.
//!
//! Configuration is loaded from environment variables (a `.env` file is read
//! by the binaries at startup) and organized by concern: Search, Price
//! History, Model and Chat.

mod chat_config;
mod history_config;
mod model_config;
mod search_config;

pub use chat_config::{ChatEnvConfig, DEFAULT_CHAT_MODEL, DEFAULT_GROQ_URL};
pub use history_config::HistoryEnvConfig;
pub use model_config::ModelEnvConfig;
pub use search_config::{DEFAULT_PRODUCT_QUERY, DEFAULT_SERPAPI_URL, SearchEnvConfig};

use anyhow::Result;
use std::env;
use std::str::FromStr;

/// Reads one configuration key. `Config::from_env` passes the process
/// environment; tests pass a map.
pub type EnvLookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Parses `key` when present and well-formed, otherwise returns `default`.
pub(crate) fn parse_or<T: FromStr>(lookup: &EnvLookup<'_>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Where listings and chat replies come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Mock,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(Mode::Live),
            "mock" => Ok(Mode::Mock),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'live' or 'mock'", s),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub search: SearchEnvConfig,
    pub history: HistoryEnvConfig,
    pub model: ModelEnvConfig,
    pub chat: ChatEnvConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Live,
            search: SearchEnvConfig::default(),
            history: HistoryEnvConfig::default(),
            model: ModelEnvConfig::default(),
            chat: ChatEnvConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key: &str| env::var(key).ok().filter(|v| !v.is_empty()))
    }

    pub fn from_lookup(lookup: &EnvLookup<'_>) -> Result<Self> {
        let mode = match lookup("MODE") {
            Some(raw) => raw.parse::<Mode>()?,
            None => Mode::Live,
        };

        Ok(Self {
            mode,
            search: SearchEnvConfig::from_lookup(lookup),
            history: HistoryEnvConfig::from_lookup(lookup),
            model: ModelEnvConfig::from_lookup(lookup),
            chat: ChatEnvConfig::from_lookup(lookup),
        })
    }
}
