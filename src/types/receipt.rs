//! Trade receipts and state-root hashing.
//!
//! A [`TradeReceipt`] summarizes one atomic taker trade, including the state
//! root of the reserve after the trade for verification.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::types::{Direction, Fill, MakerId, Qty};

/// Receipt returned by a successful taker trade.
///
/// ## State Root
///
/// The 32-byte state root is a SHA-256 digest over the SSZ encoding of the
/// reserve (both lists, every maker record). Two reserves with the same
/// root hold byte-for-byte identical books and ledgers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReceipt {
    /// Sequence number of this trade within the reserve
    pub trade_id: u64,

    /// Taker's requested direction
    pub direction: Direction,

    /// Amount the taker paid
    pub src_qty: Qty,

    /// Amount the taker received
    pub dst_amount: Qty,

    /// Realized rate (scaled by PRECISION)
    pub rate: u128,

    /// Total stake burned across all touched makers
    pub burned: Qty,

    /// Account credited with `dst_amount` by the router
    pub dest: MakerId,

    /// Per-order fills, best order first
    pub fills: Vec<Fill>,

    /// State root after execution (SHA-256, 32 bytes)
    pub state_root: [u8; 32],
}

impl TradeReceipt {
    /// Number of maker orders touched by the trade
    pub fn orders_taken(&self) -> usize {
        self.fills.len()
    }

    /// Number of maker orders that left the book
    pub fn orders_removed(&self) -> usize {
        self.fills.iter().filter(|fill| fill.removed).count()
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }
}

/// Incremental SHA-256 over SSZ-encoded records.
///
/// ## Example
///
/// ```
/// use orderbook_reserve::types::{MakerFunds, StateHasher};
///
/// let mut hasher = StateHasher::new();
/// hasher.absorb(&MakerFunds::default());
/// let root = hasher.finish();
/// assert_ne!(root, [0u8; 32]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create an empty hasher
    pub fn new() -> Self {
        Self { hasher: Sha256::new() }
    }

    /// Feed one SSZ record into the digest.
    pub fn absorb<T: SimpleSerialize>(&mut self, value: &T) {
        // Only fixed-size containers are absorbed; their encoding cannot fail.
        if let Ok(bytes) = ssz_rs::serialize(value) {
            self.hasher.update(&bytes);
        }
    }

    /// Feed raw bytes into the digest
    pub fn absorb_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Finish and return the 32-byte root
    pub fn finish(self) -> [u8; 32] {
        let result = self.hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
