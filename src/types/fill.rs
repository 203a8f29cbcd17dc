//! Per-order fill produced by a taker trade.
//!
//! ## SSZ Serialization
//!
//! Fills are serialized using SSZ so a receipt can be hashed or shipped to
//! the router without ambiguity.

use ssz_rs::prelude::*;

/// One maker order touched by a taker trade.
///
/// ## Terminology
///
/// - **Maker**: owner of the resting order
/// - **Taker**: the router-side caller of `trade`
///
/// The fill always executes at the maker's rate (`src_qty / dst_qty` of the
/// resting order); the partial leg is floored in the maker's favour.
///
/// ## Example
///
/// ```
/// use orderbook_reserve::types::Fill;
///
/// let fill = Fill::new(
///     3,      // order_id
///     100,    // maker
///     500,    // taker_paid
///     1000,   // taker_received
///     0,      // burned
///     true,   // removed
/// );
/// assert!(fill.removed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Fill {
    /// Order that was taken
    pub order_id: u32,

    /// Maker that owned the order
    pub maker: u64,

    /// Amount the taker paid into this order (maker receives it)
    pub taker_paid: u128,

    /// Amount the taker received from this order
    pub taker_received: u128,

    /// Stake burned from the maker for this fill
    pub burned: u128,

    /// Whether the order left the book (full take or dust removal)
    pub removed: bool,
}

impl Fill {
    /// Create a new fill record
    pub fn new(
        order_id: u32,
        maker: u64,
        taker_paid: u128,
        taker_received: u128,
        burned: u128,
        removed: bool,
    ) -> Self {
        Self {
            order_id,
            maker,
            taker_paid,
            taker_received,
            burned,
            removed,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
