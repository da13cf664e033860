//! Application state aggregate
//!
//! One owned struct holding every mutable map in the system, passed by
//! reference into the engine - no statics, no ambient globals. The
//! engine is the only writer.

use crate::request::FundingRequest;
use chrono::{DateTime, Utc};
use fundtrace_chain::Chain;
use fundtrace_core::{Amount, ProjectId};
use fundtrace_screening::FeatureVector;
use fundtrace_treasury::{Account, Project, ProjectStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One completed-milestone entry in a project's public work log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLogEntry {
    pub milestone: String,
    pub completed_at: DateTime<Utc>,
}

/// Aggregates for display layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub total_budget: Amount,
    pub total_released: Amount,
}

/// Everything the engine owns.
///
/// Accounts and payment histories are keyed by the project the
/// contractor is engaged on; requests by their own id.
#[derive(Debug, Default)]
pub struct AppState {
    pub(crate) projects: HashMap<ProjectId, Project>,
    pub(crate) accounts: HashMap<ProjectId, Account>,
    pub(crate) histories: HashMap<ProjectId, Vec<FeatureVector>>,
    pub(crate) work_logs: HashMap<ProjectId, Vec<WorkLogEntry>>,
    pub(crate) requests: HashMap<String, FundingRequest>,
    pub(crate) chain: Chain,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            projects: HashMap::new(),
            accounts: HashMap::new(),
            histories: HashMap::new(),
            work_logs: HashMap::new(),
            requests: HashMap::new(),
            chain: Chain::new(),
        }
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn account(&self, id: &ProjectId) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn history(&self, id: &ProjectId) -> &[FeatureVector] {
        self.histories.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn work_log(&self, id: &ProjectId) -> &[WorkLogEntry] {
        self.work_logs.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn request(&self, id: &str) -> Option<&FundingRequest> {
        self.requests.get(id)
    }

    /// Requests still awaiting a decision, in no particular order
    pub fn pending_requests(&self) -> impl Iterator<Item = &FundingRequest> {
        self.requests.values().filter(|r| r.is_pending())
    }

    /// Portfolio aggregates across every registered project
    pub fn project_stats(&self) -> ProjectStats {
        let total_projects = self.projects.len();
        let completed_projects = self
            .projects
            .values()
            .filter(|p| p.status() == ProjectStatus::Completed)
            .count();

        let mut total_budget = Amount::ZERO;
        let mut total_released = Amount::ZERO;
        for project in self.projects.values() {
            total_budget = total_budget.saturating_add(&project.total_budget);
            total_released = total_released.saturating_add(&project.released());
        }

        ProjectStats {
            total_projects,
            active_projects: total_projects - completed_projects,
            completed_projects,
            total_budget,
            total_released,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_state() {
        let state = AppState::new();
        assert!(state.project(&ProjectId::new("P1")).is_none());
        assert!(state.history(&ProjectId::new("P1")).is_empty());
        assert_eq!(state.chain.len(), 1);

        let stats = state.project_stats();
        assert_eq!(stats.total_projects, 0);
        assert_eq!(stats.total_budget, Amount::ZERO);
    }

    #[test]
    fn test_project_stats_saturate_on_extreme_budgets() {
        let mut state = AppState::new();
        for n in 0..2 {
            let p = Project::new(
                ProjectId::new(format!("BIG{n}")),
                "Oversized",
                Amount::new_unchecked(rust_decimal::Decimal::MAX),
                Project::default_milestones(),
            )
            .unwrap();
            state.projects.insert(p.id.clone(), p);
        }

        let stats = state.project_stats();
        assert_eq!(stats.total_budget.value(), rust_decimal::Decimal::MAX);
        assert!(stats.total_released.is_zero());
    }

    #[test]
    fn test_project_stats() {
        let mut state = AppState::new();

        let mut done = Project::new(
            ProjectId::new("DONE"),
            "Finished",
            Amount::new(dec!(100)).unwrap(),
            vec![fundtrace_treasury::Milestone::new("All", dec!(1.0))],
        )
        .unwrap();
        done.release_next().unwrap();

        let open = Project::new(
            ProjectId::new("OPEN"),
            "Ongoing",
            Amount::new(dec!(900)).unwrap(),
            Project::default_milestones(),
        )
        .unwrap();

        state.projects.insert(done.id.clone(), done);
        state.projects.insert(open.id.clone(), open);

        let stats = state.project_stats();
        assert_eq!(stats.total_projects, 2);
        assert_eq!(stats.active_projects, 1);
        assert_eq!(stats.completed_projects, 1);
        assert_eq!(stats.total_budget.value(), dec!(1000));
        assert_eq!(stats.total_released.value(), dec!(100.0));
    }
}
