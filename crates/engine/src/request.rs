//! Funding and top-up requests awaiting a government decision

use chrono::{DateTime, Utc};
use fundtrace_chain::EvidenceRefs;
use fundtrace_core::{Amount, ProjectId};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle of a request: pending resolves exactly once
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Denied,
}

/// Government decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Deny,
}

/// What the contractor is asking for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestKind {
    /// Next milestone tranche, backed by before/after evidence
    Evidence { evidence: EvidenceRefs },
    /// Additional funds beyond the milestone plan
    TopUp { amount: Amount, message: String },
}

/// A contractor request awaiting approval or denial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRequest {
    pub id: String,
    pub project_id: ProjectId,
    pub kind: RequestKind,
    pub status: RequestStatus,
    pub requested_by: String,
    pub created_at: DateTime<Utc>,
}

impl FundingRequest {
    pub fn evidence(
        project_id: ProjectId,
        requested_by: impl Into<String>,
        evidence: EvidenceRefs,
    ) -> Self {
        Self::new(project_id, requested_by, RequestKind::Evidence { evidence })
    }

    pub fn top_up(
        project_id: ProjectId,
        requested_by: impl Into<String>,
        amount: Amount,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            project_id,
            requested_by,
            RequestKind::TopUp {
                amount,
                message: message.into(),
            },
        )
    }

    fn new(project_id: ProjectId, requested_by: impl Into<String>, kind: RequestKind) -> Self {
        let id = format!(
            "REQ-{}",
            uuid::Uuid::new_v4().to_string()[..8].to_uppercase()
        );
        Self {
            id,
            project_id,
            kind,
            status: RequestStatus::Pending,
            requested_by: requested_by.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_request_is_pending() {
        let req = FundingRequest::evidence(
            ProjectId::new("P1"),
            "contractor",
            EvidenceRefs::new("before.png", "after.png"),
        );
        assert!(req.is_pending());
        assert!(req.id.starts_with("REQ-"));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(RequestStatus::Pending.to_string(), "pending");
        assert_eq!(RequestStatus::Approved.to_string(), "approved");
        assert_eq!(RequestStatus::Denied.to_string(), "denied");
    }

    #[test]
    fn test_top_up_kind() {
        let req = FundingRequest::top_up(
            ProjectId::new("P1"),
            "contractor",
            Amount::new(dec!(500)).unwrap(),
            "monsoon damage repairs",
        );
        assert!(matches!(req.kind, RequestKind::TopUp { .. }));
    }

    #[test]
    fn test_request_serialization() {
        let req = FundingRequest::evidence(
            ProjectId::new("P1"),
            "contractor",
            EvidenceRefs::new("b.png", "a.png"),
        );
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"status\":\"pending\""));
        let parsed: FundingRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, req);
    }
}
