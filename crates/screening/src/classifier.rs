//! Classifier capability - injected into the anomaly gate
//!
//! The gate only requires "fit on recent history, label the newest
//! point"; which model backs that is swappable. Implementations must be
//! stateless across calls: each evaluation trains fresh on the samples
//! it is handed, so the gate never drifts against stale model state.

use crate::feature::FeatureVector;

/// Verdict on a single feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Normal,
    Anomalous,
}

impl Label {
    pub fn is_anomalous(&self) -> bool {
        matches!(self, Label::Anomalous)
    }
}

/// A trainable binary classifier over fixed-length feature vectors.
pub trait Classifier: Send + Sync {
    /// Classifier name for logging
    fn name(&self) -> &str;

    /// Fit on all of `samples` and label the last one.
    ///
    /// The newest point (the attempt under evaluation) is always the
    /// final element; earlier elements are that project's history.
    fn label_newest(&self, samples: &[FeatureVector]) -> Label;
}

impl<T: Classifier + ?Sized> Classifier for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn label_newest(&self, samples: &[FeatureVector]) -> Label {
        (**self).label_newest(samples)
    }
}

/// A classifier that clears everything (for testing)
pub struct AlwaysNormal;

impl Classifier for AlwaysNormal {
    fn name(&self) -> &str {
        "AlwaysNormal"
    }

    fn label_newest(&self, _samples: &[FeatureVector]) -> Label {
        Label::Normal
    }
}

/// A classifier that flags everything (for testing)
pub struct AlwaysAnomalous;

impl Classifier for AlwaysAnomalous {
    fn name(&self) -> &str {
        "AlwaysAnomalous"
    }

    fn label_newest(&self, _samples: &[FeatureVector]) -> Label {
        Label::Anomalous
    }
}
