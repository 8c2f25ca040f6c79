//! Thread-safe handle around a `Ledger`.
//!
//! Taking the pending batch, freezing the candidate and appending the sealed
//! block each happen under the ledger mutex; the proof search runs with that
//! mutex released so transactions can keep arriving. Sealing itself is
//! serialized by a second mutex, so at most one candidate is in flight and
//! the index promised by `new_transaction` is always the block that
//! commits the transaction.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;

use super::{Block, Ledger, pow};
use crate::error::Result;
use crate::transaction::Transaction;

#[derive(Debug)]
struct State {
    ledger: Ledger,
    /// Index of the candidate currently being sealed.
    sealing: Option<u64>,
}

#[derive(Debug)]
pub struct SharedLedger {
    state: Mutex<State>,
    miner: Mutex<()>,
}

/// A candidate taken from the ledger and waiting for its proof.
struct InFlight {
    candidate: Block,
    difficulty: u32,
}

// A panic while holding either lock cannot leave the ledger half-updated
// (every mutation is a single push or take), so poisoned guards are reused.
fn relock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            state: Mutex::new(State {
                ledger,
                sealing: None,
            }),
            miner: Mutex::new(()),
        }
    }

    /// Queue a transaction and return the index of the block that will
    /// carry it, accounting for a block that is being sealed right now.
    pub fn new_transaction(&self, sender: &str, recipient: &str, amount: i64) -> Result<u64> {
        let mut state = relock(&self.state);
        let next = state.ledger.new_transaction(sender, recipient, amount)?;
        Ok(state.sealing.map_or(next, |index| index + 1))
    }

    /// Seal the current pending batch into a block and append it.
    pub fn mine_block(&self) -> Result<Block> {
        let _miner = relock(&self.miner);
        let job = self.begin_seal()?;
        let sealed = pow::seal(&job.candidate, job.difficulty);
        self.finish_seal(job, sealed)
    }

    fn begin_seal(&self) -> Result<InFlight> {
        let mut state = relock(&self.state);
        let candidate = state.ledger.take_candidate()?;
        state.sealing = Some(candidate.index);
        debug!(
            "sealing block #{} with {} txs",
            candidate.index,
            candidate.transactions.len()
        );
        Ok(InFlight {
            candidate,
            difficulty: state.ledger.difficulty(),
        })
    }

    fn finish_seal(&self, job: InFlight, sealed: Result<Block>) -> Result<Block> {
        let mut state = relock(&self.state);
        state.sealing = None;
        match sealed {
            Ok(block) => state.ledger.push_sealed(block).cloned(),
            Err(e) => {
                state.ledger.requeue(job.candidate.transactions);
                Err(e)
            }
        }
    }

    pub fn pending(&self) -> Vec<Transaction> {
        relock(&self.state).ledger.pending().to_vec()
    }

    /// Block at a 1-based chain position.
    pub fn block(&self, index: u64) -> Option<Block> {
        let state = relock(&self.state);
        let pos = usize::try_from(index.checked_sub(1)?).ok()?;
        state.ledger.chain().get(pos).cloned()
    }

    /// Run `f` with the ledger locked.
    pub fn with<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&relock(&self.state).ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use std::collections::HashSet;
    use std::panic::{self, AssertUnwindSafe};
    use std::thread;

    fn shared() -> SharedLedger {
        SharedLedger::new(Ledger::with_difficulty(2).unwrap())
    }

    #[test]
    fn mine_through_handle() {
        let s = shared();
        assert_eq!(s.new_transaction("A", "B", 10).unwrap(), 2);
        let b = s.mine_block().unwrap();
        assert_eq!(b.index, 2);
        assert_eq!(b.transactions.len(), 1);
        assert!(s.pending().is_empty());
        assert_eq!(s.with(|l| l.height()), 2);
        assert_eq!(s.block(2), Some(b));
        assert_eq!(s.block(0), None);
        assert_eq!(s.block(3), None);
        assert!(s.with(|l| l.is_valid_chain()));
    }

    #[test]
    fn submit_during_seal_is_promised_the_following_block() {
        let s = shared();
        s.new_transaction("A", "B", 1).unwrap();

        let job = s.begin_seal().unwrap();
        assert_eq!(job.candidate.index, 2);
        // block 2 is frozen, so this one must wait for block 3
        assert_eq!(s.new_transaction("C", "D", 2).unwrap(), 3);

        let sealed = pow::seal(&job.candidate, job.difficulty);
        let b2 = s.finish_seal(job, sealed).unwrap();
        assert_eq!(b2.index, 2);
        assert_eq!(b2.transactions, vec![Transaction::new("A", "B", 1)]);

        assert_eq!(s.new_transaction("E", "F", 3).unwrap(), 3);
        let b3 = s.mine_block().unwrap();
        assert_eq!(b3.index, 3);
        assert_eq!(
            b3.transactions,
            vec![Transaction::new("C", "D", 2), Transaction::new("E", "F", 3)]
        );
    }

    #[test]
    fn failed_seal_requeues_batch() {
        let s = shared();
        s.new_transaction("A", "B", 1).unwrap();
        let job = s.begin_seal().unwrap();
        s.new_transaction("C", "D", 2).unwrap();

        let err = s
            .finish_seal(job, Err(LedgerError::InvalidDifficulty(99)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidDifficulty(99)));
        assert_eq!(
            s.pending(),
            vec![Transaction::new("A", "B", 1), Transaction::new("C", "D", 2)]
        );
        assert_eq!(s.new_transaction("E", "F", 3).unwrap(), 2);
        assert_eq!(s.with(|l| l.height()), 1);
    }

    #[test]
    fn concurrent_miners_keep_chain_consistent() {
        let s = shared();

        let promises: Vec<(String, i64, u64)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let s = &s;
                    scope.spawn(move || {
                        let mut promised = Vec::new();
                        for i in 0..5 {
                            let sender = format!("w{t}");
                            let index = s.new_transaction(&sender, "sink", i).unwrap();
                            promised.push((sender, i, index));
                            s.mine_block().unwrap();
                        }
                        promised
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let chain = s.with(|l| l.chain().to_vec());
        assert_eq!(chain.len(), 21);
        assert!(s.with(|l| l.is_valid_chain()));
        assert!(s.pending().is_empty());

        // every transaction landed exactly once, in the block it was promised
        let committed: Vec<_> = chain.iter().flat_map(|b| b.transactions.iter()).collect();
        assert_eq!(committed.len(), 20);
        let unique: HashSet<_> = committed
            .iter()
            .map(|tx| (tx.sender.clone(), tx.amount))
            .collect();
        assert_eq!(unique.len(), 20);

        for (sender, amount, index) in promises {
            let block = &chain[index as usize - 1];
            assert!(
                block
                    .transactions
                    .contains(&Transaction::new(sender.as_str(), "sink", amount)),
                "{sender}/{amount} missing from promised block #{index}"
            );
        }
    }

    #[test]
    fn survives_a_panicking_reader() {
        let s = shared();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            s.with(|_| panic!("reader blew up"));
        }));
        assert!(outcome.is_err());

        assert_eq!(s.new_transaction("A", "B", 1).unwrap(), 2);
        assert_eq!(s.mine_block().unwrap().index, 2);
    }
}
