//! Screening configuration with configurable thresholds
//!
//! Thresholds load from file/env-provided JSON rather than being
//! hardcoded, so policy can be tuned without recompilation.

use serde::{Deserialize, Serialize};

/// Configuration for the anomaly gate and the default classifier.
///
/// Any field can be omitted from the JSON; defaults are conservative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    // === Gate policy ===
    /// Minimum historical attempts before any blocking at all.
    /// Cold-start projects are deliberately never blocked: availability
    /// over strictness while there is not enough data to judge.
    #[serde(default = "default_min_history")]
    pub min_history: usize,

    /// Block when the attempt exceeds this multiple of the historical
    /// mean amount. Evaluated before the statistical model so every
    /// block it produces carries a human-readable reason.
    #[serde(default = "default_high_amount_multiplier")]
    pub high_amount_multiplier: f64,

    // === Isolation forest ===
    /// Fraction of points treated as anomalous
    #[serde(default = "default_contamination")]
    pub contamination: f64,

    /// Number of random trees
    #[serde(default = "default_tree_count")]
    pub tree_count: usize,

    /// Subsample size per tree
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// RNG seed, fixed for reproducible verdicts
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_min_history() -> usize {
    5
}

fn default_high_amount_multiplier() -> f64 {
    2.0
}

fn default_contamination() -> f64 {
    0.15
}

fn default_tree_count() -> usize {
    100
}

fn default_sample_size() -> usize {
    128
}

fn default_seed() -> u64 {
    42
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            min_history: default_min_history(),
            high_amount_multiplier: default_high_amount_multiplier(),
            contamination: default_contamination(),
            tree_count: default_tree_count(),
            sample_size: default_sample_size(),
            seed: default_seed(),
        }
    }
}

impl ScreeningConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::error::ScreeningError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScreeningConfig::default();
        assert_eq!(config.min_history, 5);
        assert_eq!(config.high_amount_multiplier, 2.0);
        assert_eq!(config.contamination, 0.15);
        assert_eq!(config.tree_count, 100);
        assert_eq!(config.sample_size, 128);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{ "min_history": 10 }"#;
        let config: ScreeningConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.min_history, 10);
        assert_eq!(config.contamination, 0.15); // default
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = ScreeningConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("high_amount_multiplier"));

        let parsed: ScreeningConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.min_history, config.min_history);
    }
}
