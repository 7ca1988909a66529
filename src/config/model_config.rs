//! Price-model hyperparameters from environment variables.

use super::{EnvLookup, parse_or};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelEnvConfig {
    pub n_trees: usize,
    pub seed: u64,
    pub test_fraction: f64,
    pub min_rows: usize,
    pub max_depth: Option<u16>,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            test_fraction: 0.2,
            min_rows: 5,
            max_depth: None,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_lookup(lookup: &EnvLookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            n_trees: parse_or(lookup, "MODEL_N_TREES", defaults.n_trees).max(1),
            seed: parse_or(lookup, "MODEL_SEED", defaults.seed),
            test_fraction: parse_or(lookup, "MODEL_TEST_FRACTION", defaults.test_fraction)
                .clamp(0.0, 0.9),
            min_rows: parse_or(lookup, "MODEL_MIN_ROWS", defaults.min_rows),
            max_depth: lookup("MODEL_MAX_DEPTH").and_then(|v| v.parse().ok()),
        }
    }
}
