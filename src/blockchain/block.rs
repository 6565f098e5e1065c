use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the ledger holding a batch of transactions.
/// Immutable once appended; linkage to the predecessor goes through
/// `previous_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp in milliseconds (UTC)
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Create the genesis block. Every field is fixed so all nodes start
    /// from an identical block.
    pub fn genesis() -> Self {
        Self {
            index: 1,
            timestamp: 0,
            transactions: Vec::new(),
            proof: GENESIS_PROOF,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
        }
    }

    /// SHA-256 of the block's canonical JSON serialization, hex-encoded.
    /// Object keys are sorted in the canonical form, so the digest depends
    /// only on the block's content, never on field order.
    pub fn hash(&self) -> String {
        let canonical = serde_json::to_value(self)
            .expect("serialize block")
            .to_string();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}
