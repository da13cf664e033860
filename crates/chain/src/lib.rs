//! FundTrace chain - Append-only hash-linked audit ledger
//!
//! Every business mutation elsewhere in the system lands here as exactly
//! one immutable block. Any retroactive edit, anywhere in the chain, is
//! detectable by a full re-derivation scan.
//!
//! # Key Types
//! - `Chain`: the append-only block sequence, genesis at index 0
//! - `Block`: one immutable hash-linked record
//! - `LedgerEvent`: the closed set of auditable actions
//! - `ChainError`: first tamper/corruption found by `verify`

pub mod block;
pub mod chain;
pub mod error;
pub mod event;
pub mod hash;

pub use block::{Block, ZERO_HASH};
pub use chain::{verify_blocks, Chain};
pub use error::ChainError;
pub use event::{EvidenceRefs, LedgerEvent, RejectionStage};
pub use hash::{canonical_event_json, compute_block_hash};
