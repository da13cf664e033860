//! Gate configuration - every production threshold in one place

use fundtrace_screening::ScreeningConfig;
use fundtrace_vision::DEFAULT_THRESHOLD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading gate configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Thresholds for both payout gates, serde-loadable.
///
/// Any field can be omitted from the JSON; defaults match the
/// production gates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Minimum evidence difference score counted as real progress
    #[serde(default = "default_progress_threshold")]
    pub progress_threshold: f64,

    /// Anomaly gate and classifier thresholds
    #[serde(default)]
    pub screening: ScreeningConfig,
}

fn default_progress_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            progress_threshold: default_progress_threshold(),
            screening: ScreeningConfig::default(),
        }
    }
}

impl GateConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
