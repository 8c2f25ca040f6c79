//! Proof-of-work: a linear search for the smallest proof, starting at the
//! block's current one, whose block hash begins with `difficulty` hex zeros.
//!
//! Expected work is about 16^difficulty hashes. The search has no upper
//! bound; pick a difficulty that finishes in practical time.

use log::debug;

use super::Block;
use crate::error::{LedgerError, Result};

/// Does `hash` start with `difficulty` `'0'` characters?
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let d = difficulty as usize;
    hash.len() >= d && hash.bytes().take(d).all(|c| c == b'0')
}

/// Check the proof-of-work predicate against the block as it is now,
/// including its current `proof`.
pub fn valid_proof(block: &Block, difficulty: u32) -> Result<bool> {
    Ok(meets_difficulty(&block.hash()?, difficulty))
}

/// Return a copy of `block` whose `proof` is the first value at or above
/// the current one that satisfies `valid_proof`. No other field changes.
pub fn seal(block: &Block, difficulty: u32) -> Result<Block> {
    if difficulty as usize > super::hasher::HASH_HEX_LEN {
        return Err(LedgerError::InvalidDifficulty(difficulty));
    }

    let mut candidate = block.clone();
    let start = candidate.proof;
    loop {
        let hash = candidate.hash()?;
        if meets_difficulty(&hash, difficulty) {
            debug!(
                "sealed block #{} proof={} attempts={} hash={}",
                candidate.index,
                candidate.proof,
                candidate.proof.wrapping_sub(start).wrapping_add(1),
                hash
            );
            return Ok(candidate);
        }
        candidate.proof = candidate.proof.wrapping_add(1);
    }
}
