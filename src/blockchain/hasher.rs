//! Canonical block encoding and the SHA-256 digest over it.
//!
//! A block is rendered as compact JSON with object keys sorted at every
//! level, so two blocks with equal fields always produce the same bytes no
//! matter how they were built. The digest is lowercase hex (64 chars).

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::Block;
use crate::error::{LedgerError, Result};

/// Length of a rendered digest in hex characters.
pub const HASH_HEX_LEN: usize = 64;

const BLOCK_FIELDS: [&str; 5] = ["index", "previous_hash", "proof", "timestamp", "transactions"];
const TX_FIELDS: [&str; 3] = ["amount", "recipient", "sender"];

/// Hash of a block, covering every canonical field including `proof` and
/// `previous_hash`.
pub fn hash_of(block: &Block) -> Result<String> {
    let value =
        serde_json::to_value(block).map_err(|e| LedgerError::MalformedBlock(e.to_string()))?;
    hash_value(&value)
}

/// Hash a decoded block payload (e.g. one received as JSON).
///
/// Fails with `MalformedBlock` when a required field is absent or has the
/// wrong type; nothing is defaulted.
pub fn hash_value(value: &Value) -> Result<String> {
    check_shape(value)?;
    let bytes = canonical_bytes(value)?;
    Ok(digest_hex(&bytes))
}

/// Compact JSON bytes with lexicographically sorted keys.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>> {
    serde_json::to_vec(&sorted(value)).map_err(|e| LedgerError::MalformedBlock(e.to_string()))
}

pub fn digest_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

// serde_json may be built with `preserve_order`; rebuild every object from a
// sorted key list so the encoding never depends on insertion order.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for k in keys {
                out.insert(k.clone(), sorted(&map[k]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

fn check_shape(value: &Value) -> Result<()> {
    let obj = value
        .as_object()
        .ok_or_else(|| LedgerError::MalformedBlock("block is not an object".into()))?;

    for field in BLOCK_FIELDS {
        if !obj.contains_key(field) {
            return Err(LedgerError::MalformedBlock(format!("missing field `{field}`")));
        }
    }
    if obj.len() != BLOCK_FIELDS.len() {
        return Err(LedgerError::MalformedBlock("unexpected extra field".into()));
    }

    expect(obj["index"].is_u64(), "index")?;
    expect(obj["proof"].is_u64(), "proof")?;
    expect(obj["timestamp"].is_i64(), "timestamp")?;
    expect(obj["previous_hash"].is_string(), "previous_hash")?;

    let txs = obj["transactions"]
        .as_array()
        .ok_or_else(|| LedgerError::MalformedBlock("`transactions` is not an array".into()))?;
    for (i, tx) in txs.iter().enumerate() {
        let tx = tx
            .as_object()
            .ok_or_else(|| LedgerError::MalformedBlock(format!("transaction {i} is not an object")))?;
        for field in TX_FIELDS {
            if !tx.contains_key(field) {
                return Err(LedgerError::MalformedBlock(format!(
                    "transaction {i} missing field `{field}`"
                )));
            }
        }
        if tx.len() != TX_FIELDS.len() {
            return Err(LedgerError::MalformedBlock(format!(
                "transaction {i} has an unexpected extra field"
            )));
        }
        expect(tx["sender"].is_string(), "sender")?;
        expect(tx["recipient"].is_string(), "recipient")?;
        expect(tx["amount"].is_i64(), "amount")?;
    }
    Ok(())
}

fn expect(ok: bool, field: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(LedgerError::MalformedBlock(format!("field `{field}` has the wrong type")))
    }
}
