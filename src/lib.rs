//! # Orderbook Reserve
//!
//! Staked limit-order reserve: makers post ETH↔token limit orders backed by
//! a stake token, and a router fills taker trades against them atomically.
//!
//! ## Architecture
//!
//! The reserve consists of:
//! - **Types**: Core records (Order, MakerFunds, Fill, TradeReceipt)
//! - **Economics**: Pure rate, stake and order-size arithmetic
//! - **OrderBook**: Price-ordered linked lists with slab-based storage
//! - **Ledger**: Per-maker balances and order id pools
//! - **Engine**: Order lifecycle and atomic taker matching
//!
//! ## Design Principles
//!
//! 1. **Determinism**: All operations produce identical results for identical inputs
//! 2. **No Floating Point**: Rates are fixed-point, scaled by 10^18
//! 3. **No Rounding Bias**: Rates are ranked by cross-multiplication in 256 bits
//! 4. **All or Nothing**: Every operation validates fully before it mutates
//!
//! ## Invariants
//!
//! After every public operation:
//! - Each list is sorted by rate, best first
//! - Every maker's stake covers the stake required by its open notional
//! - Every open order locks at least half the new-order minimum
//! - Quantities stay within `MAX_QTY` and order rates within `MAX_RATE`

// ============================================================================
// Module declarations
// ============================================================================

/// Constants and construction parameters
pub mod config;

/// Error types
pub mod error;

/// Core data types: Order, MakerFunds, Fill, TradeReceipt
pub mod types;

/// Rate, stake and order size arithmetic
pub mod economics;

/// Order lists with slab-based storage
pub mod orderbook;

/// Maker balances and id pools
pub mod ledger;

/// Order lifecycle and taker matching
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::ReserveConfig;
pub use engine::{HintSource, OrderRequest, OrderUpdate, OrderbookReserve};
pub use error::{ConfigError, ReserveError, Result};
pub use orderbook::{OrderIdPool, OrderList};
pub use types::{Direction, Fill, FundKind, MakerFunds, MakerId, Order, OrderId, Qty, TradeReceipt};
