use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Ledger, SharedLedger};
use crate::transaction::Transaction;

/// Shared application state wrapping the in-memory ledger.
pub struct AppState {
    pub ledger: SharedLedger,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: SharedLedger::new(ledger),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub chain: &'a [Block],
}

#[derive(Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
}

#[derive(Serialize, Deserialize)]
pub struct BlockHashResponse {
    pub index: u64,
    pub hash: String,
}

/* ---------- Mining API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct MineResponse {
    pub index: u64,
    pub hash: String,
    pub proof: u64,
    pub previous_hash: String,
    pub timestamp: i64,
    pub transactions: Vec<Transaction>,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: i64,
}

#[derive(Serialize, Deserialize)]
pub struct NewTxResponse {
    /// Index of the block that will carry the transaction.
    pub index: u64,
}

#[derive(Serialize, Deserialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}
