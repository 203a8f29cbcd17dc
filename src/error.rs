//! Error types for the reserve.
//!
//! Every rejection is detected before any state is touched, so an `Err`
//! always means "nothing changed".

use thiserror::Error;

use crate::types::{Direction, FundKind, MakerId, OrderId, Qty};

/// Construction-time configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be non-zero")]
    Zero { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Rejections reported by reserve operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReserveError {
    #[error("insufficient {fund:?} balance: have {available}, need {required}")]
    InsufficientBalance {
        fund: FundKind,
        available: Qty,
        required: Qty,
    },

    #[error("insufficient stake: have {available}, need {required}")]
    InsufficientStake { available: Qty, required: Qty },

    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    #[error("rate {rate} exceeds maximum")]
    InvalidRate { rate: u128 },

    #[error("order {id} not found in {direction:?} list")]
    OrderNotFound { direction: Direction, id: OrderId },

    #[error("order {id} is not owned by maker {maker}")]
    MakerMismatch { id: OrderId, maker: MakerId },

    #[error("hint {hint} is not a valid insertion point")]
    InvalidHint { hint: OrderId },

    #[error("order id {0} is already on the list")]
    DuplicateOrderId(OrderId),

    #[error("hint may not reference the order being updated ({0})")]
    HintIsOrderId(OrderId),

    #[error("maker {maker} has no free {direction:?} order ids")]
    OrderIdPoolExhausted { maker: MakerId, direction: Direction },

    #[error("insufficient liquidity: {remaining} source units unmatched")]
    InsufficientLiquidity { remaining: Qty },

    #[error("rate slippage: realized {realized} below minimum {minimum}")]
    RateSlippage { realized: u128, minimum: u128 },

    #[error("trading is disabled")]
    TradeDisabled,

    #[error("unsupported asset pair {src:?} -> {dst:?}")]
    UnsupportedPair { src: FundKind, dst: FundKind },

    #[error("unknown maker {0}")]
    UnknownMaker(MakerId),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("batch entry {index} failed: {source}")]
    BatchFailed {
        index: usize,
        #[source]
        source: Box<ReserveError>,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ReserveError>;
