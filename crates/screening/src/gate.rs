//! Anomaly gate - statistical screen over payment attempts
//!
//! Pure evaluation: the gate reads history, never writes it. The caller
//! decides whether an attempt joins the record.

use crate::classifier::Classifier;
use crate::config::ScreeningConfig;
use crate::feature::{mean_amount, FeatureVector};
use tracing::{debug, warn};

/// Reason attached to high-amount blocks
pub const REASON_HIGH_AMOUNT: &str = "amount unusually high vs. history";
/// Reason attached to classifier blocks
pub const REASON_STATISTICAL: &str = "statistical anomaly detected";

/// Outcome of screening one payment attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreeningVerdict {
    /// Attempt may proceed
    Cleared { detail: String },
    /// Attempt must be refused and the refusal recorded
    Blocked { reason: String },
}

impl ScreeningVerdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, ScreeningVerdict::Blocked { .. })
    }

    /// Reason string for blocked verdicts
    pub fn reason(&self) -> Option<&str> {
        match self {
            ScreeningVerdict::Blocked { reason } => Some(reason),
            ScreeningVerdict::Cleared { .. } => None,
        }
    }
}

/// Screens payment attempts against that project's own history.
///
/// Policy, in order:
/// 1. Fewer than `min_history` records: never block.
/// 2. Amount above `high_amount_multiplier` times the historical mean:
///    block with a human-readable reason, before consulting the model.
/// 3. Classifier trained fresh on history plus the attempt labels the
///    attempt anomalous: block.
/// 4. Otherwise clear.
///
/// Per-project isolation is deliberate: the classifier only ever sees
/// the target project's history, never a shared cross-project model.
pub struct AnomalyGate<C> {
    config: ScreeningConfig,
    classifier: C,
}

impl<C: Classifier> AnomalyGate<C> {
    pub fn new(config: ScreeningConfig, classifier: C) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    /// Evaluate one attempt. Pure: no state is recorded here.
    pub fn evaluate(&self, history: &[FeatureVector], attempt: FeatureVector) -> ScreeningVerdict {
        if history.len() < self.config.min_history {
            debug!(
                records = history.len(),
                required = self.config.min_history,
                "insufficient history, attempt cleared"
            );
            return ScreeningVerdict::Cleared {
                detail: format!(
                    "insufficient history ({} of {} records)",
                    history.len(),
                    self.config.min_history
                ),
            };
        }

        if let Some(mean) = mean_amount(history) {
            if attempt.amount > self.config.high_amount_multiplier * mean {
                warn!(
                    amount = attempt.amount,
                    mean, "attempt blocked: amount far above historical mean"
                );
                return ScreeningVerdict::Blocked {
                    reason: REASON_HIGH_AMOUNT.to_string(),
                };
            }
        }

        let mut samples = history.to_vec();
        samples.push(attempt);
        if self.classifier.label_newest(&samples).is_anomalous() {
            warn!(
                classifier = self.classifier.name(),
                amount = attempt.amount,
                "attempt blocked by classifier"
            );
            return ScreeningVerdict::Blocked {
                reason: REASON_STATISTICAL.to_string(),
            };
        }

        ScreeningVerdict::Cleared {
            detail: "within historical pattern".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{AlwaysAnomalous, AlwaysNormal};

    fn fv(amount: f64) -> FeatureVector {
        FeatureVector {
            amount,
            prior_balance: 1000.0,
            budget_ratio: amount / 10_000.0,
        }
    }

    fn history(n: usize) -> Vec<FeatureVector> {
        (0..n).map(|_| fv(100.0)).collect()
    }

    #[test]
    fn test_cold_start_never_blocks() {
        let gate = AnomalyGate::new(ScreeningConfig::default(), AlwaysAnomalous);
        // 4 records is below the minimum of 5, even a huge amount passes.
        let verdict = gate.evaluate(&history(4), fv(1_000_000.0));
        assert!(!verdict.is_blocked());
    }

    #[test]
    fn test_high_amount_blocks_before_classifier() {
        // Classifier would clear it; the explainable rule fires first.
        let gate = AnomalyGate::new(ScreeningConfig::default(), AlwaysNormal);
        let verdict = gate.evaluate(&history(5), fv(201.0));
        assert_eq!(verdict.reason(), Some(REASON_HIGH_AMOUNT));
    }

    #[test]
    fn test_exactly_double_mean_is_allowed() {
        let gate = AnomalyGate::new(ScreeningConfig::default(), AlwaysNormal);
        // Strictly greater than 2x mean blocks; exactly 2x does not.
        let verdict = gate.evaluate(&history(5), fv(200.0));
        assert!(!verdict.is_blocked());
    }

    #[test]
    fn test_classifier_block() {
        let gate = AnomalyGate::new(ScreeningConfig::default(), AlwaysAnomalous);
        let verdict = gate.evaluate(&history(6), fv(100.0));
        assert_eq!(verdict.reason(), Some(REASON_STATISTICAL));
    }

    #[test]
    fn test_normal_attempt_cleared() {
        let gate = AnomalyGate::new(ScreeningConfig::default(), AlwaysNormal);
        let verdict = gate.evaluate(&history(10), fv(110.0));
        assert!(!verdict.is_blocked());
        assert!(verdict.reason().is_none());
    }
}
