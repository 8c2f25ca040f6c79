pub mod block;
pub mod hasher;
pub mod model;
pub mod pow;
pub mod shared;

pub use block::Block;
pub use hasher::hash_of;
pub use model::{Ledger, validate};
pub use shared::SharedLedger;

use crate::error::Result;

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Starting proof of the genesis block before it is sealed.
pub const GENESIS_PROOF: u64 = 100;

/// `previous_hash` sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/* -------- Caller-facing entry points -------- */

/// Build a ledger with a sealed genesis block at the default difficulty.
pub fn create_ledger() -> Result<Ledger> {
    Ledger::new()
}

/// Queue a transaction; returns the index of the block that will carry it.
pub fn submit_transaction(
    ledger: &mut Ledger,
    sender: &str,
    recipient: &str,
    amount: i64,
) -> Result<u64> {
    ledger.new_transaction(sender, recipient, amount)
}

/// Commit the pending batch into a new sealed block and return it.
pub fn mine_block(ledger: &mut Ledger) -> Result<Block> {
    ledger.mine_block().cloned()
}

pub fn is_chain_valid(ledger: &Ledger) -> bool {
    ledger.is_valid_chain()
}
