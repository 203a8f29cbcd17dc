//! Core data types for the reserve
//!
//! Records that take part in the state root implement SSZ serialization
//! for deterministic encoding. All quantities are raw token units.
//!
//! ## Types
//!
//! - [`Order`]: A maker limit order with its list links
//! - [`Direction`]: ETH→token or token→ETH
//! - [`FundKind`]: Ether, Token or Stake
//! - [`MakerFunds`]: Per-maker balances and locked notional
//! - [`Fill`]: One maker order touched by a taker trade
//! - [`TradeReceipt`]: Summary of an atomic taker trade

mod order;
mod funds;
mod fill;
mod receipt;
pub mod amount;

// Re-export all types at module level
pub use order::{Direction, MakerId, Order, OrderId, Qty};
pub use funds::{FundKind, MakerFunds};
pub use fill::Fill;
pub use receipt::{StateHasher, TradeReceipt};
