//! FundTrace treasury - budget custody
//!
//! Two state machines, each owning only its own state:
//! - `Project`: milestone-gated release of a fixed budget
//! - `Account`: contractor balance, credited by releases and debited by
//!   approved payouts
//!
//! Neither knows about the audit chain or the payment gates; the engine
//! crate coordinates them.

pub mod account;
pub mod error;
pub mod project;

pub use account::Account;
pub use error::TreasuryError;
pub use project::{Milestone, MilestoneRelease, Project, ProjectStatus};
