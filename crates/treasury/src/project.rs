//! Government project - milestone-gated fund release
//!
//! Each project carries a fixed budget split into named milestone
//! tranches. Tranches release in declared order, each exactly once, and
//! the running total can never pass the budget. Projects are never
//! deleted; the audit trail outlives them.

use crate::error::TreasuryError;
use fundtrace_core::{Amount, ProjectId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One named tranche of the project budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    /// Fraction of the total budget this tranche releases
    pub share: Decimal,
}

impl Milestone {
    pub fn new(name: impl Into<String>, share: Decimal) -> Self {
        Self {
            name: name.into(),
            share,
        }
    }
}

/// Outcome of a successful milestone release
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneRelease {
    pub milestone: String,
    pub amount: Amount,
}

/// Derived lifecycle state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
}

/// A budgeted project with an ordered milestone plan.
///
/// # Invariants
/// - `released <= total_budget` after every operation
/// - `released` equals the sum of completed shares times the budget
/// - milestone shares summing to 1.0 is a construction precondition of
///   the caller, assumed but not enforced at runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub total_budget: Amount,
    released: Amount,
    milestones: Vec<Milestone>,
    completed: Vec<String>,
}

impl Project {
    /// Register a project with its milestone plan.
    ///
    /// The budget must be positive and at least one milestone must be
    /// declared. Callers are responsible for shares summing to 1.0.
    pub fn new(
        id: ProjectId,
        name: impl Into<String>,
        total_budget: Amount,
        milestones: Vec<Milestone>,
    ) -> Result<Self, TreasuryError> {
        if total_budget.is_zero() {
            return Err(TreasuryError::InvalidBudget(total_budget.value()));
        }
        if milestones.is_empty() {
            return Err(TreasuryError::NoMilestones);
        }
        Ok(Self {
            id,
            name: name.into(),
            total_budget,
            released: Amount::ZERO,
            milestones,
            completed: Vec::new(),
        })
    }

    /// The standard 30/40/30 three-milestone plan
    pub fn default_milestones() -> Vec<Milestone> {
        vec![
            Milestone::new("Milestone 1", dec!(0.30)),
            Milestone::new("Milestone 2", dec!(0.40)),
            Milestone::new("Milestone 3", dec!(0.30)),
        ]
    }

    /// Release the first milestone not yet completed, in declared order.
    ///
    /// Each milestone releases exactly once; there is deliberately no
    /// way to release out of order or to re-release. The budget check is
    /// defensive: it cannot trip when shares sum to 1.0, but a
    /// mis-declared plan must still never overdraw the budget.
    pub fn release_next(&mut self) -> Result<MilestoneRelease, TreasuryError> {
        let next = self
            .milestones
            .iter()
            .find(|m| !self.completed.contains(&m.name))
            .ok_or(TreasuryError::NoEligibleMilestone)?;

        let amount = self
            .total_budget
            .share_of(next.share)
            .ok_or_else(|| TreasuryError::BudgetExceeded {
                requested: next.share.saturating_mul(self.total_budget.value()),
                remaining: self.remaining().value(),
            })?;

        let released = self
            .released
            .checked_add(&amount)
            .filter(|total| *total <= self.total_budget)
            .ok_or(TreasuryError::BudgetExceeded {
                requested: amount.value(),
                remaining: self.remaining().value(),
            })?;

        let milestone = next.name.clone();
        self.completed.push(milestone.clone());
        self.released = released;

        info!(
            project = %self.id,
            milestone = %milestone,
            amount = %amount,
            released = %self.released,
            "milestone released"
        );

        Ok(MilestoneRelease { milestone, amount })
    }

    /// Funds released so far
    pub fn released(&self) -> Amount {
        self.released
    }

    /// Budget not yet released
    pub fn remaining(&self) -> Amount {
        self.total_budget
            .checked_sub(&self.released)
            .unwrap_or(Amount::ZERO)
    }

    /// Declared milestone plan, in release order
    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    /// Names of completed milestones, in completion order
    pub fn completed_milestones(&self) -> &[String] {
        &self.completed
    }

    /// Active while any milestone is outstanding and budget remains
    pub fn status(&self) -> ProjectStatus {
        if self.completed.len() == self.milestones.len() || self.released >= self.total_budget {
            ProjectStatus::Completed
        } else {
            ProjectStatus::Active
        }
    }
}
