//! Disbursement engine - the single writer over all state
//!
//! Every mutation flows through one `&mut self` method here, which is
//! what serializes the chain: state changes and their audit blocks
//! commit together or not at all. Gate refusals are recorded, treasury
//! refusals are not (nothing value-bearing happened), and validation
//! errors never reach the chain.

use crate::config::GateConfig;
use crate::error::EngineError;
use crate::request::{Decision, FundingRequest, RequestKind, RequestStatus};
use crate::state::{AppState, ProjectStats, WorkLogEntry};
use chrono::Utc;
use fundtrace_chain::{Chain, ChainError, EvidenceRefs, LedgerEvent, RejectionStage};
use fundtrace_core::{Amount, ProjectId};
use fundtrace_screening::{AnomalyGate, Classifier, FeatureVector, IsolationForest};
use fundtrace_treasury::{Account, Milestone, MilestoneRelease, Project};
use fundtrace_vision::{ImageComparator, PixelDiff, ProgressGate};
use std::path::PathBuf;
use tracing::{info, warn};

/// One payout attempt, as submitted by a contractor
#[derive(Debug, Clone)]
pub struct PayoutRequest {
    pub project_id: ProjectId,
    pub recipient: String,
    pub amount: Amount,
    /// Evidence image of the site before the work
    pub before: PathBuf,
    /// Evidence image of the site after the work
    pub after: PathBuf,
}

/// Proof of a completed payout, returned to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutReceipt {
    pub payment: fundtrace_core::PaymentRecord,
    pub remaining_balance: Amount,
    /// Difference score the evidence pair passed with
    pub progress_score: f64,
    /// Index of the audit block recording this payout
    pub block_index: u64,
}

/// Outcome of resolving a pending request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestResolution {
    pub request_id: String,
    pub status: RequestStatus,
    /// Present when an approval released a milestone tranche
    pub release: Option<MilestoneRelease>,
}

/// Orchestrates projects, accounts, gates and the audit chain.
///
/// Both gates are injected as trait objects so tests (and alternative
/// deployments) can swap the comparator or classifier without touching
/// the flow.
pub struct DisbursementEngine {
    state: AppState,
    progress: ProgressGate<Box<dyn ImageComparator>>,
    anomaly: AnomalyGate<Box<dyn Classifier>>,
}

impl DisbursementEngine {
    pub fn new(
        progress: ProgressGate<Box<dyn ImageComparator>>,
        anomaly: AnomalyGate<Box<dyn Classifier>>,
    ) -> Self {
        Self {
            state: AppState::new(),
            progress,
            anomaly,
        }
    }

    /// Production wiring: pixel comparison and an isolation forest,
    /// both at default thresholds.
    pub fn standard() -> Self {
        Self::with_config(GateConfig::default())
    }

    /// Production gates with custom thresholds
    pub fn with_config(config: GateConfig) -> Self {
        let forest: Box<dyn Classifier> =
            Box::new(IsolationForest::from_config(&config.screening));
        let comparator: Box<dyn ImageComparator> = Box::new(PixelDiff);
        Self::new(
            ProgressGate::with_threshold(comparator, config.progress_threshold),
            AnomalyGate::new(config.screening, forest),
        )
    }

    // === Projects ===

    /// Register a project with its budget, contractor and milestone plan.
    ///
    /// Opens the contractor's disbursement account at zero and records
    /// the registration. Project ids are unique forever; a completed
    /// project still occupies its id.
    pub fn create_project(
        &mut self,
        id: ProjectId,
        name: impl Into<String>,
        budget: Amount,
        contractor: impl Into<String>,
        milestones: Vec<Milestone>,
    ) -> Result<&Project, EngineError> {
        if self.state.projects.contains_key(&id) {
            return Err(EngineError::DuplicateProject(id));
        }

        let name = name.into();
        let contractor = contractor.into();
        let project = Project::new(id.clone(), name.clone(), budget, milestones)?;

        self.state
            .accounts
            .insert(id.clone(), Account::new(id.clone(), contractor.clone()));
        self.state.chain.append(LedgerEvent::ProjectCreated {
            project_id: id.clone(),
            name,
            budget,
            contractor,
        });
        info!(project = %id, budget = %budget, "project created");

        self.state.projects.insert(id.clone(), project);
        Ok(&self.state.projects[&id])
    }

    /// Release the next milestone tranche directly (government action,
    /// no contractor request involved).
    pub fn release_next_milestone(
        &mut self,
        project_id: &ProjectId,
    ) -> Result<MilestoneRelease, EngineError> {
        self.release_to_account(project_id)
    }

    fn release_to_account(
        &mut self,
        project_id: &ProjectId,
    ) -> Result<MilestoneRelease, EngineError> {
        let project = self
            .state
            .projects
            .get_mut(project_id)
            .ok_or_else(|| EngineError::ProjectNotFound(project_id.clone()))?;

        let release = project.release_next()?;

        let account = self
            .state
            .accounts
            .get_mut(project_id)
            .ok_or_else(|| EngineError::ProjectNotFound(project_id.clone()))?;
        account.credit(release.amount);
        let balance = account.balance();

        self.state
            .work_logs
            .entry(project_id.clone())
            .or_default()
            .push(WorkLogEntry {
                milestone: release.milestone.clone(),
                completed_at: Utc::now(),
            });
        self.state.chain.append(LedgerEvent::MilestoneReleased {
            project_id: project_id.clone(),
            milestone: release.milestone.clone(),
            amount: release.amount,
            account_balance: balance,
        });

        Ok(release)
    }

    // === Payouts ===

    /// Run a payout attempt through both gates and, if both clear,
    /// move the funds.
    ///
    /// Gate refusals return an error AND append a rejection block: a
    /// refused attempt is itself an auditable fact. A treasury refusal
    /// (insufficient balance) only returns the error. History gains the
    /// attempt's feature vector only when the payout completes.
    pub fn attempt_payout(&mut self, request: PayoutRequest) -> Result<PayoutReceipt, EngineError> {
        let project = self
            .state
            .projects
            .get(&request.project_id)
            .ok_or_else(|| EngineError::ProjectNotFound(request.project_id.clone()))?;
        let total_budget = project.total_budget;

        let report = self.progress.evaluate(&request.before, &request.after);
        if !report.passed {
            warn!(
                project = %request.project_id,
                score = report.score,
                detail = %report.detail,
                "payout refused by progress check"
            );
            self.state.chain.append(LedgerEvent::PayoutRejected {
                project_id: request.project_id.clone(),
                stage: RejectionStage::ProgressCheck,
                reason: format!("insufficient visual progress ({})", report.detail),
                attempted_amount: request.amount,
                recipient: request.recipient.clone(),
            });
            return Err(EngineError::ProgressCheckFailed {
                score: report.score,
                threshold: report.threshold,
                detail: report.detail,
            });
        }

        let account = self
            .state
            .accounts
            .get(&request.project_id)
            .ok_or_else(|| EngineError::ProjectNotFound(request.project_id.clone()))?;
        let attempt = FeatureVector::describe(request.amount, account.balance(), total_budget);

        let history = self
            .state
            .histories
            .get(&request.project_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let verdict = self.anomaly.evaluate(history, attempt);
        if let Some(reason) = verdict.reason() {
            let reason = reason.to_string();
            warn!(
                project = %request.project_id,
                amount = %request.amount,
                %reason,
                "payout refused by anomaly screen"
            );
            self.state.chain.append(LedgerEvent::PayoutRejected {
                project_id: request.project_id.clone(),
                stage: RejectionStage::AnomalyScreen,
                reason: reason.clone(),
                attempted_amount: request.amount,
                recipient: request.recipient,
            });
            return Err(EngineError::AnomalyBlocked { reason });
        }

        let account = self
            .state
            .accounts
            .get_mut(&request.project_id)
            .ok_or_else(|| EngineError::ProjectNotFound(request.project_id.clone()))?;
        let payment = account.debit(request.recipient, request.amount)?;
        let remaining_balance = account.balance();

        self.state
            .histories
            .entry(request.project_id.clone())
            .or_default()
            .push(attempt);

        let evidence = EvidenceRefs::new(
            request.before.to_string_lossy(),
            request.after.to_string_lossy(),
        );
        let block = self.state.chain.append(LedgerEvent::PayoutCompleted {
            project_id: request.project_id.clone(),
            payment: payment.clone(),
            remaining_balance,
            evidence,
        });
        let block_index = block.index;
        info!(
            project = %request.project_id,
            to = %payment.to,
            amount = %payment.amount,
            block = block_index,
            "payout completed"
        );

        Ok(PayoutReceipt {
            payment,
            remaining_balance,
            progress_score: report.score,
            block_index,
        })
    }

    // === Requests ===

    /// File a funding request backed by before/after evidence.
    ///
    /// Nothing is released here; the request waits for `resolve_request`.
    pub fn request_funding(
        &mut self,
        project_id: ProjectId,
        requested_by: impl Into<String>,
        evidence: EvidenceRefs,
    ) -> Result<&FundingRequest, EngineError> {
        if !self.state.projects.contains_key(&project_id) {
            return Err(EngineError::ProjectNotFound(project_id));
        }

        let request = FundingRequest::evidence(project_id.clone(), requested_by, evidence.clone());
        let id = request.id.clone();
        self.state.chain.append(LedgerEvent::FundingRequested {
            project_id,
            request_id: id.clone(),
            requested_by: request.requested_by.clone(),
            evidence,
        });
        info!(request = %id, "funding request filed");

        self.state.requests.insert(id.clone(), request);
        Ok(&self.state.requests[&id])
    }

    /// File a top-up request for funds beyond the milestone plan
    pub fn request_top_up(
        &mut self,
        project_id: ProjectId,
        requested_by: impl Into<String>,
        amount: Amount,
        message: impl Into<String>,
    ) -> Result<&FundingRequest, EngineError> {
        if !self.state.projects.contains_key(&project_id) {
            return Err(EngineError::ProjectNotFound(project_id));
        }

        let request = FundingRequest::top_up(project_id.clone(), requested_by, amount, message);
        let id = request.id.clone();
        self.state.chain.append(LedgerEvent::TopUpRequested {
            project_id,
            request_id: id.clone(),
            amount,
            requested_by: request.requested_by.clone(),
        });
        info!(request = %id, amount = %amount, "top-up request filed");

        self.state.requests.insert(id.clone(), request);
        Ok(&self.state.requests[&id])
    }

    /// Decide a pending request. A request resolves exactly once.
    ///
    /// Approving an evidence request releases the next milestone
    /// tranche; approving a top-up credits the requested amount. The
    /// decision is recorded before its consequence, so a ledger reader
    /// sees approval then release in that order. If the release then
    /// fails (no eligible milestone left), the approval stands and the
    /// error is surfaced.
    pub fn resolve_request(
        &mut self,
        request_id: &str,
        decision: Decision,
        decided_by: impl Into<String>,
    ) -> Result<RequestResolution, EngineError> {
        let request = self
            .state
            .requests
            .get(request_id)
            .ok_or_else(|| EngineError::UnknownRequest(request_id.to_string()))?;
        if !request.is_pending() {
            return Err(EngineError::RequestNotPending(request_id.to_string()));
        }
        let project_id = request.project_id.clone();
        let kind = request.kind.clone();
        let decided_by = decided_by.into();

        match decision {
            Decision::Deny => {
                self.set_request_status(request_id, RequestStatus::Denied);
                let event = match kind {
                    RequestKind::Evidence { .. } => LedgerEvent::FundingDenied {
                        project_id,
                        request_id: request_id.to_string(),
                        denied_by: decided_by,
                    },
                    RequestKind::TopUp { .. } => LedgerEvent::TopUpDenied {
                        project_id,
                        request_id: request_id.to_string(),
                        denied_by: decided_by,
                    },
                };
                self.state.chain.append(event);
                info!(request = %request_id, "request denied");
                Ok(RequestResolution {
                    request_id: request_id.to_string(),
                    status: RequestStatus::Denied,
                    release: None,
                })
            }
            Decision::Approve => match kind {
                RequestKind::Evidence { .. } => {
                    self.set_request_status(request_id, RequestStatus::Approved);
                    self.state.chain.append(LedgerEvent::FundingApproved {
                        project_id: project_id.clone(),
                        request_id: request_id.to_string(),
                        approved_by: decided_by,
                    });
                    let release = self.release_to_account(&project_id)?;
                    info!(
                        request = %request_id,
                        milestone = %release.milestone,
                        "funding request approved"
                    );
                    Ok(RequestResolution {
                        request_id: request_id.to_string(),
                        status: RequestStatus::Approved,
                        release: Some(release),
                    })
                }
                RequestKind::TopUp { amount, .. } => {
                    self.set_request_status(request_id, RequestStatus::Approved);
                    let account = self
                        .state
                        .accounts
                        .get_mut(&project_id)
                        .ok_or_else(|| EngineError::ProjectNotFound(project_id.clone()))?;
                    account.credit(amount);
                    self.state.chain.append(LedgerEvent::TopUpApproved {
                        project_id,
                        request_id: request_id.to_string(),
                        amount,
                        approved_by: decided_by,
                    });
                    info!(request = %request_id, amount = %amount, "top-up approved");
                    Ok(RequestResolution {
                        request_id: request_id.to_string(),
                        status: RequestStatus::Approved,
                        release: None,
                    })
                }
            },
        }
    }

    fn set_request_status(&mut self, request_id: &str, status: RequestStatus) {
        if let Some(request) = self.state.requests.get_mut(request_id) {
            request.status = status;
        }
    }

    // === Read side ===

    /// All application state, read-only
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The audit chain, genesis first
    pub fn ledger(&self) -> &Chain {
        &self.state.chain
    }

    /// Re-derive every block hash and check linkage
    pub fn verify_ledger(&self) -> Result<(), ChainError> {
        self.state.chain.verify()
    }

    /// Portfolio aggregates across every registered project
    pub fn project_stats(&self) -> ProjectStats {
        self.state.project_stats()
    }
}
