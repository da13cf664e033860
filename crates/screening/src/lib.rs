//! FundTrace screening - statistical anomaly gate
//!
//! Screens payout attempts against the owning project's payment history
//! before any funds move. Two layers: a cheap explainable rule (amount
//! far above the historical mean) and an injected classifier trained
//! fresh on each call.
//!
//! # Key Types
//! - `AnomalyGate`: the policy, pure evaluation
//! - `Classifier` / `IsolationForest`: the injected model capability
//! - `FeatureVector`: numeric description of one attempt
//! - `ScreeningConfig`: thresholds, serde-loadable

pub mod classifier;
pub mod config;
pub mod error;
pub mod feature;
pub mod forest;
pub mod gate;

pub use classifier::{AlwaysAnomalous, AlwaysNormal, Classifier, Label};
pub use config::ScreeningConfig;
pub use error::ScreeningError;
pub use feature::{mean_amount, FeatureVector};
pub use forest::IsolationForest;
pub use gate::{AnomalyGate, ScreeningVerdict, REASON_HIGH_AMOUNT, REASON_STATISTICAL};
