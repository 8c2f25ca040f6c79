//! Runtime settings read from the environment (and `.env`, loaded by `main`).

use std::env;

use crate::blockchain::DEFAULT_DIFFICULTY;
use crate::blockchain::hasher::HASH_HEX_LEN;
use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Leading hex zeros every block hash must carry.
    pub difficulty: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

impl Config {
    /// Read `HOST`, `PORT` and `DIFFICULTY`, falling back to defaults for
    /// unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = match lookup("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| LedgerError::Config(format!("PORT must be a port number, got {v:?}")))?,
            None => defaults.port,
        };
        let difficulty = match lookup("DIFFICULTY") {
            Some(v) => v.trim().parse().map_err(|_| {
                LedgerError::Config(format!("DIFFICULTY must be an integer, got {v:?}"))
            })?,
            None => defaults.difficulty,
        };
        if difficulty == 0 || difficulty as usize > HASH_HEX_LEN {
            return Err(LedgerError::InvalidDifficulty(difficulty));
        }

        Ok(Self {
            host,
            port,
            difficulty,
        })
    }
}
