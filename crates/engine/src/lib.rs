//! FundTrace engine - disbursement orchestration
//!
//! Wires the treasury, both gates and the audit chain behind a single
//! `&mut self` surface. Callers see one type, `DisbursementEngine`;
//! everything it does lands in the chain as exactly zero or one block.
//!
//! # Key Types
//! - `DisbursementEngine`: the single writer over all state
//! - `AppState`: projects, accounts, histories, requests, chain
//! - `FundingRequest` / `Decision`: the approval workflow
//! - `EngineError`: validation, policy and treasury failures

pub mod config;
pub mod engine;
pub mod error;
pub mod request;
pub mod state;

pub use config::{ConfigError, GateConfig};
pub use engine::{DisbursementEngine, PayoutReceipt, PayoutRequest, RequestResolution};
pub use error::EngineError;
pub use request::{Decision, FundingRequest, RequestKind, RequestStatus};
pub use state::{AppState, ProjectStats, WorkLogEntry};
