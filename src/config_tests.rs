use crate::config::{Config, DEFAULT_CHAT_MODEL, Mode};
use std::collections::HashMap;
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(&|key: &str| map.get(key).cloned())
}

#[test]
fn test_defaults_without_any_variables() {
    let config = config_from(&[]).unwrap();

    assert_eq!(config.mode, Mode::Live);
    assert_eq!(config.search.country, "in");
    assert_eq!(config.search.language, "en");
    assert_eq!(config.search.num_results, 100);
    assert_eq!(config.search.default_query, "gold chain for men");
    assert_eq!(config.history.sample_size, 20);
    assert_eq!(config.history.days, 7);
    assert!(!config.history.use_live_api());
    assert_eq!(config.model.n_trees, 100);
    assert_eq!(config.model.seed, 42);
    assert_eq!(config.model.min_rows, 5);
    assert!((config.model.test_fraction - 0.2).abs() < 1e-9);
    assert_eq!(config.chat.model, DEFAULT_CHAT_MODEL);
    assert!((config.chat.temperature - 0.5).abs() < 1e-6);
    assert_eq!(config.chat.max_tokens, 500);
    assert_eq!(config.chat.history_window, 4);
}

#[test]
fn test_overrides_and_malformed_values() {
    let config = config_from(&[
        ("MODE", "Mock"),
        ("SEARCH_COUNTRY", "us"),
        ("SEARCH_NUM_RESULTS", "not-a-number"),
        ("HISTORY_DAYS", "1"),
        ("MODEL_N_TREES", "25"),
        ("MODEL_MAX_DEPTH", "8"),
        ("PRICE_API_KEY", "secret"),
        ("PRICE_API_URL", "https://prices.example/v1/history"),
    ])
    .unwrap();

    assert_eq!(config.mode, Mode::Mock);
    assert_eq!(config.search.country, "us");
    // Malformed numbers keep the default
    assert_eq!(config.search.num_results, 100);
    // A 24h change needs two days of samples
    assert_eq!(config.history.days, 2);
    assert_eq!(config.model.n_trees, 25);
    assert_eq!(config.model.max_depth, Some(8));
    assert!(config.history.use_live_api());
}

#[test]
fn test_invalid_mode_is_rejected() {
    let err = config_from(&[("MODE", "paper")]).unwrap_err();
    assert!(err.to_string().contains("Invalid MODE"));
}

#[test]
fn test_config_reads_process_environment() {
    let _guard = get_env_lock().lock().unwrap();
    unsafe {
        env::set_var("SEARCH_LANGUAGE", "hi");
        env::set_var("CHAT_MAX_TOKENS", "256");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.search.language, "hi");
    assert_eq!(config.chat.max_tokens, 256);

    // Cleanup
    unsafe {
        env::remove_var("SEARCH_LANGUAGE");
        env::remove_var("CHAT_MAX_TOKENS");
    }
}
