//! Reserve engine: order lifecycle and taker matching.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Same input always produces same output
//! 2. **Fixed-Point Math**: No floating-point operations
//! 3. **Validate, then mutate**: every check runs before the first write
//! 4. **Rate-Time Priority**: Best rate first, then insertion order
//!
//! ## Matching Rules
//!
//! - **ETH -> token** requests are filled by token -> ETH maker orders
//! - **Token -> ETH** requests are filled by ETH -> token maker orders
//! - **Partial fills** shrink the last touched order in place
//! - **Dust** remainders below half the minimum order are removed and refunded
//!
//! ## Example
//!
//! ```
//! use orderbook_reserve::{OrderbookReserve, ReserveConfig};
//! use orderbook_reserve::types::{Direction, FundKind};
//!
//! const ETH: u128 = 1_000_000_000_000_000_000;
//!
//! let mut reserve = OrderbookReserve::new(ReserveConfig::default()).unwrap();
//! reserve.deposit(1, FundKind::Token, 1_000 * ETH).unwrap();
//! reserve.deposit(1, FundKind::Stake, 100 * ETH).unwrap();
//!
//! // Maker sells 1000 tokens for 4 ETH
//! reserve.submit_order(1, Direction::TokenToEth, 1_000 * ETH, 4 * ETH, None).unwrap();
//!
//! // Taker pays 4 ETH
//! let receipt = reserve.trade(FundKind::Ether, 4 * ETH, FundKind::Token, 9, 0).unwrap();
//! assert_eq!(receipt.dst_amount, 1_000 * ETH);
//! assert!(reserve.order_list(Direction::TokenToEth).is_empty());
//! ```

pub mod lifecycle;
pub mod matcher;
pub mod reserve;

pub use lifecycle::{HintSource, OrderRequest, OrderUpdate};
pub use reserve::OrderbookReserve;
