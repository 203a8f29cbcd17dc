//! Order types for the reserve's order lists.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so the state root is a
//! deterministic function of the book contents:
//! - Basic types (u32, u64, u128): direct little-endian encoding
//! - Fixed-size composites: concatenated little-endian fields
//!
//! ## Quantities
//!
//! `src_qty` and `dst_qty` are raw token units. Their ratio is the order's
//! rate: a higher `src_qty / dst_qty` is a better deal for the taker and
//! ranks closer to the head of the list.

use ssz_rs::prelude::*;

use crate::types::FundKind;

/// Identifier of an order inside one list. `HEAD_ID` and `TAIL_ID` are reserved.
pub type OrderId = u32;

/// Maker account identifier
pub type MakerId = u64;

/// Raw token quantity (wei, token base units, stake base units)
pub type Qty = u128;

// ============================================================================
// Direction enum
// ============================================================================

/// Trade direction.
///
/// For a maker this names the list the order rests in (what the maker gives
/// → what the maker wants). For a taker it names the requested conversion;
/// a taker request is filled from the [`opposite`](Direction::opposite) list.
///
/// Represented as u8 for SSZ compatibility:
/// - EthToToken = 0
/// - TokenToEth = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// ETH in, token out
    #[default]
    EthToToken,
    /// Token in, ETH out
    TokenToEth,
}

impl Direction {
    /// Both directions, in list storage order
    pub const ALL: [Direction; 2] = [Direction::EthToToken, Direction::TokenToEth];

    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Direction::EthToToken => 0,
            Direction::TokenToEth => 1,
        }
    }

    /// Returns the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::EthToToken => Direction::TokenToEth,
            Direction::TokenToEth => Direction::EthToToken,
        }
    }

    /// Index into per-direction arrays
    #[inline]
    pub fn index(self) -> usize {
        self.to_u8() as usize
    }

    /// Map a router asset pair onto a direction.
    ///
    /// Only ETH↔token pairs are tradeable; the stake token never is.
    pub fn from_assets(src: FundKind, dst: FundKind) -> Option<Self> {
        match (src, dst) {
            (FundKind::Ether, FundKind::Token) => Some(Direction::EthToToken),
            (FundKind::Token, FundKind::Ether) => Some(Direction::TokenToEth),
            _ => None,
        }
    }

    /// Asset given up by whoever trades in this direction
    pub fn src_fund(self) -> FundKind {
        match self {
            Direction::EthToToken => FundKind::Ether,
            Direction::TokenToEth => FundKind::Token,
        }
    }

    /// Asset received by whoever trades in this direction
    pub fn dst_fund(self) -> FundKind {
        self.opposite().src_fund()
    }

    /// The ETH-denominated leg of an order resting in this direction's list
    #[inline]
    pub fn wei_leg(self, src_qty: Qty, dst_qty: Qty) -> Qty {
        match self {
            Direction::EthToToken => src_qty,
            Direction::TokenToEth => dst_qty,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A maker limit order and its list links.
///
/// ## SSZ Layout
///
/// Fixed-size container: 4 + 8 + 16 + 16 + 4 + 4 = 52 bytes.
///
/// ## Example
///
/// ```
/// use orderbook_reserve::types::{Direction, Order};
///
/// // Maker gives 1000 wei, wants 500 token units
/// let order = Order::new(3, 100, 1000, 500);
/// assert_eq!(order.wei_amount(Direction::EthToToken), 1000);
/// assert_eq!(order.wei_amount(Direction::TokenToEth), 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Order id (drawn from the maker's pool for this list)
    pub id: u32,

    /// Owning maker
    pub maker: u64,

    /// Amount the maker gives
    pub src_qty: u128,

    /// Amount the maker wants in return
    pub dst_qty: u128,

    /// Previous (better or equal) order id
    pub prev: u32,

    /// Next (worse or equal) order id
    pub next: u32,
}

impl Order {
    /// Create a new unlinked order
    pub fn new(id: OrderId, maker: MakerId, src_qty: Qty, dst_qty: Qty) -> Self {
        Self {
            id,
            maker,
            src_qty,
            dst_qty,
            prev: 0,
            next: 0,
        }
    }

    /// ETH leg of this order when it rests in `direction`'s list
    #[inline]
    pub fn wei_amount(&self, direction: Direction) -> Qty {
        direction.wei_leg(self.src_qty, self.dst_qty)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
