//! Chat assistant configuration parsing from environment variables.

use super::{EnvLookup, parse_or};

pub const DEFAULT_GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone)]
pub struct ChatEnvConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Prior messages replayed to the model with each question.
    pub history_window: usize,
}

impl Default for ChatEnvConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_GROQ_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.5,
            max_tokens: 500,
            history_window: 4,
        }
    }
}

impl ChatEnvConfig {
    pub fn from_lookup(lookup: &EnvLookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: lookup("GROQ_API_KEY").unwrap_or_default(),
            base_url: lookup("GROQ_BASE_URL").unwrap_or(defaults.base_url),
            model: lookup("CHAT_MODEL").unwrap_or(defaults.model),
            temperature: parse_or(lookup, "CHAT_TEMPERATURE", defaults.temperature),
            max_tokens: parse_or(lookup, "CHAT_MAX_TOKENS", defaults.max_tokens),
            history_window: parse_or(lookup, "CHAT_HISTORY_WINDOW", defaults.history_window),
        }
    }
}
