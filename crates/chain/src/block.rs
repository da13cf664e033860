//! Block - one immutable, hash-linked record

use crate::event::LedgerEvent;
use crate::hash::compute_block_hash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Previous-hash sentinel of the genesis block
pub const ZERO_HASH: &str = "0";

/// One immutable record in the audit chain.
///
/// # Invariant
/// `hash == sha256(index, timestamp, canonical_json(event), prev_hash)`.
/// Blocks are only ever constructed by `Chain`; nothing mutates them
/// after append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, starting at 0 for genesis
    pub index: u64,
    /// Append time
    pub timestamp: DateTime<Utc>,
    /// The business action this block records
    pub event: LedgerEvent,
    /// Hash of the preceding block (`ZERO_HASH` for genesis)
    pub prev_hash: String,
    /// Hash over this block's own fields
    pub hash: String,
}

impl Block {
    /// Build a block at `index` linked to `prev_hash`, stamping it now.
    pub(crate) fn new(index: u64, event: LedgerEvent, prev_hash: String) -> Self {
        let timestamp = Utc::now();
        let hash = compute_block_hash(index, &timestamp, &event, &prev_hash);
        Self {
            index,
            timestamp,
            event,
            prev_hash,
            hash,
        }
    }

    /// The fixed genesis block at index 0
    pub(crate) fn genesis() -> Self {
        Self::new(0, LedgerEvent::Genesis, ZERO_HASH.to_string())
    }

    /// Recompute this block's hash from its stored fields.
    ///
    /// Used by verification; a mismatch with the stored `hash` means the
    /// block was altered after append.
    pub fn recomputed_hash(&self) -> String {
        compute_block_hash(self.index, &self.timestamp, &self.event, &self.prev_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_shape() {
        let genesis = Block::genesis();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.prev_hash, ZERO_HASH);
        assert_eq!(genesis.event, LedgerEvent::Genesis);
        assert_eq!(genesis.hash, genesis.recomputed_hash());
    }

    #[test]
    fn test_recomputed_hash_detects_tamper() {
        let mut block = Block::genesis();
        assert_eq!(block.hash, block.recomputed_hash());

        block.index = 7;
        assert_ne!(block.hash, block.recomputed_hash());
    }
}
