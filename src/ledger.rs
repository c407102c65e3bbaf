//! Coin transaction ledger
//!
//! Persisted alongside progression, keeps the most recent grants for the
//! wallet screen.

use serde::{Deserialize, Serialize};

use crate::progression::CoinGrant;

/// Maximum number of transactions to keep
pub const MAX_TRANSACTIONS: usize = 20;

/// A single coin grant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinTransaction {
    pub amount: u64,
    /// Display reason ("Victory!", "Achievement: Brawler", ...)
    pub reason: String,
    /// Unix timestamp (ms) when granted
    pub timestamp: f64,
}

/// Recent coin grants, newest first
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CoinLedger {
    pub entries: Vec<CoinTransaction>,
}

impl CoinLedger {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "rps_coin_ledger";

    /// Create empty ledger
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a transaction. Zero-coin grants are skipped.
    pub fn add(&mut self, amount: u64, reason: impl Into<String>, timestamp: f64) -> bool {
        if amount == 0 {
            return false;
        }
        self.entries.insert(
            0,
            CoinTransaction {
                amount,
                reason: reason.into(),
                timestamp,
            },
        );
        self.entries.truncate(MAX_TRANSACTIONS);
        true
    }

    /// Record a progression grant with its attributed reason
    pub fn add_grant(&mut self, grant: &CoinGrant, timestamp: f64) -> bool {
        self.add(grant.amount, grant.source.reason(), timestamp)
    }

    /// Check if the ledger is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent transaction (if any)
    pub fn latest(&self) -> Option<&CoinTransaction> {
        self.entries.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{CoinSource, achievements};

    #[test]
    fn test_newest_first_and_trimmed() {
        let mut ledger = CoinLedger::new();
        for i in 0..(MAX_TRANSACTIONS as u64 + 5) {
            ledger.add(i + 1, "Battle Complete", i as f64);
        }
        assert_eq!(ledger.entries.len(), MAX_TRANSACTIONS);
        assert_eq!(ledger.latest().unwrap().amount, MAX_TRANSACTIONS as u64 + 5);
    }

    #[test]
    fn test_zero_grants_skipped() {
        let mut ledger = CoinLedger::new();
        assert!(!ledger.add(0, "nothing", 0.0));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_grant_reason() {
        let mut ledger = CoinLedger::new();
        let def = achievements::find("brawler").unwrap();
        ledger.add_grant(
            &CoinGrant {
                amount: def.coin_reward,
                source: CoinSource::Achievement(def),
            },
            5.0,
        );
        assert_eq!(ledger.latest().unwrap().reason, "Achievement: Brawler");
    }
}
