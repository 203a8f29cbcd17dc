//! Order book storage for the reserve.
//!
//! ## Architecture
//!
//! The book is a pair of price-ordered linked lists, one per direction:
//!
//! - **Slab-based storage**: O(1) order insertion, removal, and lookup
//! - **Id-linked chain**: orders link to each other by order id, between
//!   the reserved `HEAD` and `TAIL` sentinels
//! - **Rate priority**: best `src/dst` rate first, then insertion order
//!
//! ## Components
//!
//! - [`OrderList`]: sorted list for one direction, with hinted insertion
//! - [`OrderIdPool`]: per-maker block of recyclable order ids
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Insert with correct hint | O(1) |
//! | Insert by scan | O(n) |
//! | Remove by id | O(1) |
//! | Best order | O(1) |
//!
//! ## Example
//!
//! ```
//! use orderbook_reserve::orderbook::OrderList;
//! use orderbook_reserve::types::{Direction, Order};
//!
//! let mut list = OrderList::with_capacity(Direction::EthToToken, 64);
//!
//! // Rate 2:1 and the better rate 3:1
//! list.add_sorted(Order::new(3, 100, 1_000, 500)).unwrap();
//! list.add_sorted(Order::new(4, 100, 1_500, 500)).unwrap();
//!
//! assert_eq!(list.first_order_id(), 4);
//! ```

pub mod id_pool;
pub mod list;

pub use id_pool::OrderIdPool;
pub use list::OrderList;
