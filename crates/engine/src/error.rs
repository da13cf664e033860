//! Engine errors
//!
//! Three families, handled differently by callers:
//! - validation errors (`DuplicateProject`, `ProjectNotFound`,
//!   `UnknownRequest`, `RequestNotPending`): caller's fault, surfaced,
//!   never retried, never recorded;
//! - policy rejections (`ProgressCheckFailed`, `AnomalyBlocked`):
//!   legitimate refusals, surfaced AND recorded in the audit chain;
//! - resource exhaustion (wrapped `TreasuryError`): surfaced, not
//!   recorded - no value-bearing event occurred.

use fundtrace_core::ProjectId;
use fundtrace_treasury::TreasuryError;
use thiserror::Error;

/// Errors from disbursement operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Project '{0}' already exists")]
    DuplicateProject(ProjectId),

    #[error("Project '{0}' not found")]
    ProjectNotFound(ProjectId),

    #[error("Funding request '{0}' not found")]
    UnknownRequest(String),

    #[error("Funding request '{0}' was already resolved")]
    RequestNotPending(String),

    #[error("Progress check failed: score {score:.4} below threshold {threshold} ({detail})")]
    ProgressCheckFailed {
        score: f64,
        threshold: f64,
        detail: String,
    },

    #[error("Payout blocked by anomaly screen: {reason}")]
    AnomalyBlocked { reason: String },

    #[error(transparent)]
    Treasury(#[from] TreasuryError),
}
