//! Ledger events - the closed set of auditable actions
//!
//! Every block carries exactly one of these variants. The set is closed
//! on purpose: a fixed, typed payload serializes the same way every
//! time, which keeps the block hash reproducible across processes.

use fundtrace_core::{Amount, PaymentRecord, ProjectId};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// References to the before/after evidence images backing a payout or
/// funding request. Stored as caller-supplied path strings; the ledger
/// never touches the files themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRefs {
    pub before: String,
    pub after: String,
}

impl EvidenceRefs {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// Which gate rejected a payout attempt
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RejectionStage {
    /// Before/after image comparison did not show enough change
    ProgressCheck,
    /// Statistical screening flagged the attempt
    AnomalyScreen,
}

/// One auditable business action, recorded in a single block.
///
/// Serialized with an internal `action` tag so exported ledgers remain
/// self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Fixed sentinel payload of block 0
    Genesis,

    /// A new project was registered with its budget and contractor
    ProjectCreated {
        project_id: ProjectId,
        name: String,
        budget: Amount,
        contractor: String,
    },

    /// A milestone tranche was released and credited to the contractor
    MilestoneReleased {
        project_id: ProjectId,
        milestone: String,
        amount: Amount,
        account_balance: Amount,
    },

    /// A contractor payout passed both gates and was debited
    PayoutCompleted {
        project_id: ProjectId,
        payment: PaymentRecord,
        remaining_balance: Amount,
        evidence: EvidenceRefs,
    },

    /// A payout attempt was refused by a gate; no funds moved
    PayoutRejected {
        project_id: ProjectId,
        stage: RejectionStage,
        reason: String,
        attempted_amount: Amount,
        recipient: String,
    },

    /// Contractor submitted evidence and asked for the next tranche
    FundingRequested {
        project_id: ProjectId,
        request_id: String,
        requested_by: String,
        evidence: EvidenceRefs,
    },

    /// Government approved a pending funding request
    FundingApproved {
        project_id: ProjectId,
        request_id: String,
        approved_by: String,
    },

    /// Government denied a pending funding request
    FundingDenied {
        project_id: ProjectId,
        request_id: String,
        denied_by: String,
    },

    /// Contractor asked for additional funds beyond the milestone plan
    TopUpRequested {
        project_id: ProjectId,
        request_id: String,
        amount: Amount,
        requested_by: String,
    },

    /// Government approved a pending top-up request
    TopUpApproved {
        project_id: ProjectId,
        request_id: String,
        amount: Amount,
        approved_by: String,
    },

    /// Government denied a pending top-up request
    TopUpDenied {
        project_id: ProjectId,
        request_id: String,
        denied_by: String,
    },
}

impl LedgerEvent {
    /// Project this event belongs to, if any (Genesis has none)
    pub fn project_id(&self) -> Option<&ProjectId> {
        match self {
            LedgerEvent::Genesis => None,
            LedgerEvent::ProjectCreated { project_id, .. }
            | LedgerEvent::MilestoneReleased { project_id, .. }
            | LedgerEvent::PayoutCompleted { project_id, .. }
            | LedgerEvent::PayoutRejected { project_id, .. }
            | LedgerEvent::FundingRequested { project_id, .. }
            | LedgerEvent::FundingApproved { project_id, .. }
            | LedgerEvent::FundingDenied { project_id, .. }
            | LedgerEvent::TopUpRequested { project_id, .. }
            | LedgerEvent::TopUpApproved { project_id, .. }
            | LedgerEvent::TopUpDenied { project_id, .. } => Some(project_id),
        }
    }
}
