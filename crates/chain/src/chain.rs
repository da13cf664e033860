//! Append-only chain of hash-linked blocks

use crate::block::{Block, ZERO_HASH};
use crate::error::ChainError;
use crate::event::LedgerEvent;
use tracing::debug;

/// The append-only audit ledger.
///
/// Created with the genesis block, grows monotonically, never truncated
/// or reordered. `Chain` is the exclusive owner of its blocks; the
/// append path reads the tail and must therefore stay single-writer,
/// which `&mut self` enforces.
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create a chain holding only the genesis block
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    /// Append a new block recording `event` and return it.
    ///
    /// Always succeeds: the index and prev_hash are derived from the
    /// current tail, and hashing a well-formed event cannot fail.
    pub fn append(&mut self, event: LedgerEvent) -> &Block {
        let tail = self
            .blocks
            .last()
            .unwrap_or_else(|| unreachable!("chain always holds genesis"));
        let block = Block::new(tail.index + 1, event, tail.hash.clone());
        debug!(index = block.index, hash = %block.hash, "block appended");
        self.blocks.push(block);
        self.blocks
            .last()
            .unwrap_or_else(|| unreachable!("block was just pushed"))
    }

    /// All blocks in order, genesis first
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The most recently appended block
    pub fn tip(&self) -> &Block {
        self.blocks
            .last()
            .unwrap_or_else(|| unreachable!("chain always holds genesis"))
    }

    /// Number of blocks, genesis included
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// A chain always holds at least the genesis block
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Re-derive every block hash and check linkage, front to back.
    ///
    /// O(n) full-chain scan on purpose: a single corrupted byte anywhere
    /// must be catchable. Returns the first failure found.
    pub fn verify(&self) -> Result<(), ChainError> {
        let genesis = &self.blocks[0];
        if genesis.index != 0 {
            return Err(ChainError::BadGenesis {
                reason: format!("index {} at position 0", genesis.index),
            });
        }
        if genesis.prev_hash != ZERO_HASH {
            return Err(ChainError::BadGenesis {
                reason: format!("prev_hash '{}' is not '{ZERO_HASH}'", genesis.prev_hash),
            });
        }

        for (position, block) in self.blocks.iter().enumerate() {
            if block.index != position as u64 {
                return Err(ChainError::IndexMismatch {
                    position: position as u64,
                    actual: block.index,
                });
            }

            let recomputed = block.recomputed_hash();
            if block.hash != recomputed {
                return Err(ChainError::HashMismatch {
                    index: block.index,
                    expected: recomputed,
                    actual: block.hash.clone(),
                });
            }

            if position > 0 {
                let prev = &self.blocks[position - 1];
                if block.prev_hash != prev.hash {
                    return Err(ChainError::BrokenLink {
                        index: block.index,
                        expected: prev.hash.clone(),
                        actual: block.prev_hash.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Convenience wrapper over `verify` for display layers
    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify an externally supplied block sequence (e.g. a JSON export).
///
/// Same checks as `Chain::verify`, over blocks the process did not
/// build itself.
pub fn verify_blocks(blocks: &[Block]) -> Result<(), ChainError> {
    if blocks.is_empty() {
        return Err(ChainError::BadGenesis {
            reason: "empty chain".to_string(),
        });
    }
    let chain = Chain {
        blocks: blocks.to_vec(),
    };
    chain.verify()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundtrace_core::{Amount, ProjectId};
    use rust_decimal_macros::dec;

    fn created_event(n: u32) -> LedgerEvent {
        LedgerEvent::ProjectCreated {
            project_id: ProjectId::new(format!("P{n}")),
            name: format!("Project {n}"),
            budget: Amount::new(dec!(1000)).unwrap(),
            contractor: "Bluebridge Constructions".to_string(),
        }
    }

    #[test]
    fn test_new_chain_is_valid() {
        let chain = Chain::new();
        assert_eq!(chain.len(), 1);
        assert!(chain.verify().is_ok());
    }

    #[test]
    fn test_valid_after_every_append() {
        let mut chain = Chain::new();
        for n in 0..5 {
            chain.append(created_event(n));
            assert!(chain.verify().is_ok());
        }
        assert_eq!(chain.len(), 6);
        assert_eq!(chain.tip().index, 5);
    }

    #[test]
    fn test_append_links_to_tail() {
        let mut chain = Chain::new();
        let genesis_hash = chain.tip().hash.clone();
        let block = chain.append(created_event(1));
        assert_eq!(block.index, 1);
        assert_eq!(block.prev_hash, genesis_hash);
    }

    #[test]
    fn test_mutated_payload_detected() {
        let mut chain = Chain::new();
        chain.append(created_event(1));
        chain.append(created_event(2));

        chain.blocks[1].event = created_event(99);

        let err = chain.verify().unwrap_err();
        assert!(matches!(err, ChainError::HashMismatch { index: 1, .. }));
    }

    #[test]
    fn test_mutated_timestamp_detected() {
        let mut chain = Chain::new();
        chain.append(created_event(1));

        chain.blocks[1].timestamp += chrono::Duration::seconds(1);

        assert!(matches!(
            chain.verify().unwrap_err(),
            ChainError::HashMismatch { index: 1, .. }
        ));
    }

    #[test]
    fn test_relinked_block_detected() {
        let mut chain = Chain::new();
        chain.append(created_event(1));
        chain.append(created_event(2));

        // Re-hash block 2 against a forged prev_hash: the hash itself is
        // consistent but the linkage no longer matches block 1.
        chain.blocks[2].prev_hash = "f".repeat(64);
        chain.blocks[2].hash = chain.blocks[2].recomputed_hash();

        assert!(matches!(
            chain.verify().unwrap_err(),
            ChainError::BrokenLink { index: 2, .. }
        ));
    }

    #[test]
    fn test_mutated_index_detected() {
        let mut chain = Chain::new();
        chain.append(created_event(1));

        chain.blocks[1].index = 9;

        assert!(matches!(
            chain.verify().unwrap_err(),
            ChainError::IndexMismatch { position: 1, .. }
        ));
    }

    #[test]
    fn test_verify_exported_blocks() {
        let mut chain = Chain::new();
        chain.append(created_event(1));

        let exported: Vec<Block> = chain.blocks().to_vec();
        assert!(verify_blocks(&exported).is_ok());

        let mut tampered = exported.clone();
        tampered[1].event = created_event(2);
        assert!(verify_blocks(&tampered).is_err());

        assert!(verify_blocks(&[]).is_err());
    }

    #[test]
    fn test_export_roundtrip_stays_valid() {
        let mut chain = Chain::new();
        chain.append(created_event(1));
        chain.append(created_event(2));

        let json = serde_json::to_string(chain.blocks()).unwrap();
        let parsed: Vec<Block> = serde_json::from_str(&json).unwrap();
        assert!(verify_blocks(&parsed).is_ok());
    }
}
