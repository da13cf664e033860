//! Chain integrity errors
//!
//! Any variant here means the record was tampered with or corrupted
//! after append. Verification only reports the first failing block; it
//! never attempts repair.

use thiserror::Error;

/// Errors found while verifying the hash chain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Hash mismatch at block {index}: expected '{expected}', stored '{actual}'")]
    HashMismatch {
        index: u64,
        expected: String,
        actual: String,
    },

    #[error("Broken link at block {index}: expected prev_hash '{expected}', stored '{actual}'")]
    BrokenLink {
        index: u64,
        expected: String,
        actual: String,
    },

    #[error("Block at position {position} carries index {actual}")]
    IndexMismatch { position: u64, actual: u64 },

    #[error("Genesis block malformed: {reason}")]
    BadGenesis { reason: String },
}
