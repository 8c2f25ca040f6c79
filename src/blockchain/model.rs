use std::mem;

use log::{debug, info, warn};

use super::{Block, DEFAULT_DIFFICULTY, GENESIS_PREVIOUS_HASH, hasher, pow};
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// In-memory ledger: the sealed chain plus the transactions waiting for the
/// next block.
///
/// The chain always holds at least the genesis block and is only ever
/// appended to.
#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    difficulty: u32,
}

impl Ledger {
    /// Initialize a ledger at `DEFAULT_DIFFICULTY`.
    pub fn new() -> Result<Self> {
        Self::with_difficulty(DEFAULT_DIFFICULTY)
    }

    /// Initialize a ledger whose blocks must all carry `difficulty` leading
    /// hex zeros. The genesis block is sealed like any other.
    pub fn with_difficulty(difficulty: u32) -> Result<Self> {
        if difficulty == 0 || difficulty as usize > hasher::HASH_HEX_LEN {
            return Err(LedgerError::InvalidDifficulty(difficulty));
        }
        let genesis = pow::seal(&Block::genesis(), difficulty)?;
        info!(
            "genesis sealed: proof={} hash={} difficulty={}",
            genesis.proof,
            genesis.hash()?,
            difficulty
        );
        Ok(Self {
            chain: vec![genesis],
            pending: Vec::new(),
            difficulty,
        })
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Queue a transaction for the next block and return that block's index.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: i64,
    ) -> Result<u64> {
        let next_index = self.last_block()?.index + 1;
        let tx = Transaction::new(sender, recipient, amount);
        debug!(
            "queued tx {} -> {} ({}) for block #{}",
            tx.sender, tx.recipient, tx.amount, next_index
        );
        self.pending.push(tx);
        Ok(next_index)
    }

    /// Append a block built from the pending batch with a caller-supplied
    /// proof. `previous_hash` defaults to the hash of the current head.
    ///
    /// No proof-of-work is run here; see `mine_block` for that.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> Result<&Block> {
        let previous_hash = match previous_hash {
            Some(h) => h,
            None => self.last_block()?.hash()?,
        };
        let block = Block::new(
            self.chain.len() as u64 + 1,
            proof,
            previous_hash,
            mem::take(&mut self.pending),
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Seal the pending batch into a new block and append it.
    pub fn mine_block(&mut self) -> Result<&Block> {
        let candidate = self.take_candidate()?;
        let sealed = pow::seal(&candidate, self.difficulty)?;
        self.push_sealed(sealed)
    }

    /// Freeze an unsealed block on top of the current head, moving the
    /// pending batch into it.
    pub(crate) fn take_candidate(&mut self) -> Result<Block> {
        let head = self.last_block()?;
        let (index, previous_hash) = (head.index + 1, head.hash()?);
        Ok(Block::new(
            index,
            0,
            previous_hash,
            mem::take(&mut self.pending),
        ))
    }

    /// Put a batch taken by `take_candidate` back at the front of the
    /// pending queue, ahead of anything submitted since.
    pub(crate) fn requeue(&mut self, mut transactions: Vec<Transaction>) {
        transactions.append(&mut self.pending);
        self.pending = transactions;
    }

    pub(crate) fn push_sealed(&mut self, block: Block) -> Result<&Block> {
        info!(
            "sealed block #{} (txs={}, proof={}, hash={})",
            block.index,
            block.transactions.len(),
            block.proof,
            block.hash()?
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Validate the entire chain: linkage, indices and proof-of-work.
    pub fn is_valid_chain(&self) -> bool {
        validate(&self.chain, self.difficulty)
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Number of blocks in the chain, genesis included.
    pub fn height(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    #[cfg(test)]
    pub(crate) fn chain_mut(&mut self) -> &mut Vec<Block> {
        &mut self.chain
    }
}

/// Check a chain for internal consistency at `difficulty`.
///
/// The genesis block must have index 1 and the sentinel previous hash;
/// every later block must follow its predecessor's index and carry its
/// hash; every block, genesis included, must satisfy the proof-of-work.
pub fn validate(chain: &[Block], difficulty: u32) -> bool {
    match find_fault(chain, difficulty) {
        None => true,
        Some((index, reason)) => {
            warn!("chain invalid at block #{index}: {reason}");
            false
        }
    }
}

fn find_fault(chain: &[Block], difficulty: u32) -> Option<(u64, String)> {
    let Some(genesis) = chain.first() else {
        return Some((0, LedgerError::EmptyChain.to_string()));
    };
    if !genesis.is_genesis() || genesis.previous_hash != GENESIS_PREVIOUS_HASH {
        return Some((genesis.index, "bad genesis header".into()));
    }

    let mut prev_hash: Option<String> = None;
    let mut prev_index = 0;
    for block in chain {
        let hash = match block.hash() {
            Ok(h) => h,
            Err(e) => return Some((block.index, e.to_string())),
        };

        if let Some(expected) = &prev_hash {
            if block.index != prev_index + 1 {
                return Some((block.index, format!("index does not follow {prev_index}")));
            }
            if &block.previous_hash != expected {
                return Some((block.index, "previous_hash does not match predecessor".into()));
            }
        }

        if !pow::meets_difficulty(&hash, difficulty) {
            return Some((block.index, format!("hash {hash} misses difficulty {difficulty}")));
        }

        prev_index = block.index;
        prev_hash = Some(hash);
    }
    None
}
