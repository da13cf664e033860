//! Progress gate - before/after evidence verification
//!
//! A payout may only proceed when the evidence images show enough
//! visual change. The gate itself never errors: missing or unreadable
//! evidence fails the check instead of raising, because an exception
//! path that skips the gate would be an exception path that skips the
//! audit trail.

use crate::compare::ImageComparator;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Default minimum difference score counted as real progress
pub const DEFAULT_THRESHOLD: f64 = 0.08;

/// Outcome of one progress check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Whether the evidence shows enough change to proceed
    pub passed: bool,
    /// Difference score in [0, 1]
    pub score: f64,
    /// Threshold the score was held against
    pub threshold: f64,
    /// Which metric produced the score, or why none could
    pub detail: String,
}

/// Gates payouts on visual evidence of physical progress.
///
/// Runs the injected comparator; if that fails to produce a score
/// (decode error, unsupported format), the check fails closed with the
/// error in the report detail. A deployment without image decoding
/// injects `FileSizeDelta` as its comparator instead.
pub struct ProgressGate<C> {
    threshold: f64,
    comparator: C,
}

impl<C: ImageComparator> ProgressGate<C> {
    pub fn new(comparator: C) -> Self {
        Self::with_threshold(comparator, DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(comparator: C, threshold: f64) -> Self {
        Self {
            threshold,
            comparator,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score the evidence pair. Never silently passes and never raises.
    pub fn evaluate(&self, before: &Path, after: &Path) -> ProgressReport {
        if !before.exists() || !after.exists() {
            warn!(?before, ?after, "evidence file missing");
            return ProgressReport {
                passed: false,
                score: 0.0,
                threshold: self.threshold,
                detail: "file missing".to_string(),
            };
        }

        match self.comparator.compare(before, after) {
            Ok(score) => self.report(score, self.comparator.name()),
            Err(err) => {
                warn!(
                    comparator = self.comparator.name(),
                    %err,
                    "comparator failed, evidence check fails closed"
                );
                ProgressReport {
                    passed: false,
                    score: 0.0,
                    threshold: self.threshold,
                    detail: format!("error: {err}"),
                }
            }
        }
    }

    fn report(&self, score: f64, metric: &str) -> ProgressReport {
        let passed = score >= self.threshold;
        debug!(score, threshold = self.threshold, passed, metric, "progress scored");
        ProgressReport {
            passed,
            score,
            threshold: self.threshold,
            detail: metric.to_string(),
        }
    }
}
