//! Treasury errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from project and account operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("All milestones already completed")]
    NoEligibleMilestone,

    #[error("Release of {requested} would exceed remaining budget {remaining}")]
    BudgetExceeded {
        requested: Decimal,
        remaining: Decimal,
    },

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Project budget must be positive, got {0}")]
    InvalidBudget(Decimal),

    #[error("Project must declare at least one milestone")]
    NoMilestones,
}
