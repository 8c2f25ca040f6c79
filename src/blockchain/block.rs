use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::hasher;
use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::error::Result;
use crate::transaction::Transaction;

/// A single block in the ledger holding a batch of transactions.
///
/// The hash is derived from these fields on demand and never stored, so it
/// cannot go stale or feed back into itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    pub timestamp: i64, // Unix milliseconds (UTC)
    pub transactions: Vec<Transaction>,
    /// Proof-of-work solution.
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Unsealed genesis block: index 1, proof 100, previous hash "1".
    pub fn genesis() -> Self {
        Self::new(
            1,
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
            Vec::new(),
        )
    }

    /// Create a block stamped with the current time. Call
    /// `pow::seal` to find a valid proof.
    pub fn new(
        index: u64,
        proof: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self::new_with_timestamp(
            index,
            proof,
            previous_hash,
            transactions,
            Utc::now().timestamp_millis(),
        )
    }

    pub fn new_with_timestamp(
        index: u64,
        proof: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
        timestamp: i64,
    ) -> Self {
        Self {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash,
        }
    }

    /// SHA-256 of the canonical encoding of this block.
    pub fn hash(&self) -> Result<String> {
        hasher::hash_of(self)
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 1
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::transaction::Transaction;

    #[test]
    fn genesis_has_fixed_fields() {
        let g = Block::genesis();
        assert_eq!(g.index, 1);
        assert_eq!(g.proof, 100);
        assert_eq!(g.previous_hash, "1");
        assert!(g.transactions.is_empty());
        assert!(g.is_genesis());
    }

    #[test]
    fn hash_is_not_part_of_serialized_block() {
        let b = Block::new(2, 0, "prev".into(), vec![Transaction::new("A", "B", 1)]);
        let value = serde_json::to_value(&b).unwrap();
        assert!(value.get("hash").is_none());
        assert_eq!(b.hash().unwrap(), b.clone().hash().unwrap());
    }

    #[test]
    fn invalid_when_mutated() {
        let mut b = Block::new(2, 0, "prev".into(), vec![Transaction::new("A", "B", 1)]);
        let old_hash = b.hash().unwrap();

        b.transactions.push(Transaction::new("x", "y", 1));

        assert_ne!(old_hash, b.hash().unwrap());
    }
}
