//! Price-ordered order list.
//!
//! ## Architecture
//!
//! One `OrderList` holds every maker order for a single direction:
//!
//! - **Slab**: contiguous storage for order records
//! - **HashMap**: order id to slab key, for O(1) lookup by id
//! - **Links**: each order carries `prev`/`next` order ids, forming a single
//!   doubly linked chain from `HEAD_ID` to `TAIL_ID`
//!
//! ```text
//! HEAD -> best order <-> ... <-> worst order -> TAIL
//! ```
//!
//! The sentinels are reserved ids, not stored records: `HEAD` is the
//! `head_next` field and `TAIL` is simply where the chain stops.
//!
//! ## Ordering
//!
//! Orders are sorted by `src_qty / dst_qty` descending, compared by
//! cross-multiplication. A new order is placed after every order with the
//! same rate, so the first order at a rate keeps priority.
//!
//! ## Hints
//!
//! Callers may name the order after which a new order belongs. A hint is
//! verified against both neighbours before use; a wrong hint falls back to
//! a full scan and never inserts out of order.

use std::cmp::Ordering;
use std::collections::HashMap;

use slab::Slab;
use tracing::debug;

use crate::config::{HEAD_ID, TAIL_ID};
use crate::economics::compare_rates;
use crate::error::{ReserveError, Result};
use crate::types::{Direction, Order, OrderId, Qty, StateHasher};

/// Sorted doubly linked list of orders for one direction.
#[derive(Debug, Clone)]
pub struct OrderList {
    /// Direction of every order in this list
    direction: Direction,

    /// Order storage
    /// Key: slab index, Value: Order (with prev/next links)
    nodes: Slab<Order>,

    /// Order id to slab key mapping
    index: HashMap<OrderId, usize>,

    /// `HEAD.next`: best order, or `TAIL_ID` when empty
    head_next: OrderId,
}

impl OrderList {
    /// Create an empty list
    pub fn new(direction: Direction) -> Self {
        Self::with_capacity(direction, 0)
    }

    /// Create a list with pre-allocated capacity
    ///
    /// # Example
    ///
    /// ```
    /// use orderbook_reserve::orderbook::OrderList;
    /// use orderbook_reserve::types::Direction;
    ///
    /// let list = OrderList::with_capacity(Direction::EthToToken, 1_000);
    /// assert!(list.is_empty());
    /// ```
    pub fn with_capacity(direction: Direction, capacity: usize) -> Self {
        Self {
            direction,
            nodes: Slab::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            head_next: TAIL_ID,
        }
    }

    // ========================================================================
    // Size and Lookup
    // ========================================================================

    /// Direction of this list
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of open orders
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the list has no orders
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get an open order by id. Sentinels are never returned.
    #[inline]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.index.get(&id).and_then(|&key| self.nodes.get(key))
    }

    #[inline]
    fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        let key = *self.index.get(&id)?;
        self.nodes.get_mut(key)
    }

    /// Check if an order is open on this list
    #[inline]
    pub fn contains(&self, id: OrderId) -> bool {
        self.index.contains_key(&id)
    }

    /// Best order id, or `TAIL_ID` when the list is empty
    #[inline]
    pub fn first_order_id(&self) -> OrderId {
        self.head_next
    }

    /// Successor of `id`.
    ///
    /// `HEAD_ID` yields the best order; the last order yields `TAIL_ID`.
    /// Returns `None` for ids that are not on the list.
    pub fn next_order_id(&self, id: OrderId) -> Option<OrderId> {
        if id == HEAD_ID {
            return Some(self.head_next);
        }
        self.get(id).map(|order| order.next)
    }

    /// Iterate orders from best to worst
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head_next,
        }
    }

    /// Order ids from best to worst
    pub fn ids(&self) -> Vec<OrderId> {
        self.iter().map(|order| order.id).collect()
    }

    // ========================================================================
    // Positioning
    // ========================================================================

    /// Id after which an order with this rate belongs.
    ///
    /// Walks from `HEAD` past every order that ranks at least as high as the
    /// candidate. Returns `HEAD_ID` when the candidate becomes the best order.
    ///
    /// # Example
    ///
    /// ```
    /// use orderbook_reserve::config::HEAD_ID;
    /// use orderbook_reserve::orderbook::OrderList;
    /// use orderbook_reserve::types::{Direction, Order};
    ///
    /// let mut list = OrderList::new(Direction::EthToToken);
    /// list.add_sorted(Order::new(3, 1, 100, 200)).unwrap();
    ///
    /// assert_eq!(list.find_insertion_point(100, 100), HEAD_ID); // better
    /// assert_eq!(list.find_insertion_point(100, 300), 3); // worse
    /// assert_eq!(list.find_insertion_point(100, 200), 3); // equal goes after
    /// ```
    pub fn find_insertion_point(&self, src_qty: Qty, dst_qty: Qty) -> OrderId {
        self.scan_insertion_point(src_qty, dst_qty, None)
    }

    /// Like [`find_insertion_point`](Self::find_insertion_point), treating
    /// `excluded` as if it were not on the list.
    pub fn find_insertion_point_excluding(
        &self,
        src_qty: Qty,
        dst_qty: Qty,
        excluded: OrderId,
    ) -> OrderId {
        self.scan_insertion_point(src_qty, dst_qty, Some(excluded))
    }

    fn scan_insertion_point(&self, src_qty: Qty, dst_qty: Qty, excluded: Option<OrderId>) -> OrderId {
        let mut prev = HEAD_ID;

        for order in self.iter() {
            if Some(order.id) == excluded {
                continue;
            }
            if compare_rates(src_qty, dst_qty, order.src_qty, order.dst_qty) == Ordering::Greater {
                break;
            }
            prev = order.id;
        }

        prev
    }

    /// Verify that inserting `(src_qty, dst_qty)` right after `hint` keeps
    /// the list sorted.
    ///
    /// The hint must be an open order (not a sentinel), the candidate must
    /// not rank higher than the hint, and the hint's successor must not rank
    /// higher than the candidate.
    pub fn is_correct_hint(&self, hint: OrderId, src_qty: Qty, dst_qty: Qty) -> bool {
        if hint == HEAD_ID || hint == TAIL_ID {
            return false;
        }

        let Some(hinted) = self.get(hint) else {
            return false;
        };

        if compare_rates(src_qty, dst_qty, hinted.src_qty, hinted.dst_qty) == Ordering::Greater {
            return false;
        }

        if hinted.next == TAIL_ID {
            return true;
        }

        match self.get(hinted.next) {
            Some(next) => {
                compare_rates(next.src_qty, next.dst_qty, src_qty, dst_qty) != Ordering::Greater
            }
            None => false,
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Link `order` directly after `prev_id`, without checking the sort.
    ///
    /// `prev_id` must be `HEAD_ID` or an open order, and `order.id` must be a
    /// fresh non-sentinel id. The order's own `prev`/`next` are overwritten.
    pub fn insert_after(&mut self, prev_id: OrderId, mut order: Order) -> Result<()> {
        let id = order.id;
        if id == HEAD_ID || id == TAIL_ID || self.contains(id) {
            return Err(ReserveError::DuplicateOrderId(id));
        }

        let next_id = if prev_id == HEAD_ID {
            self.head_next
        } else {
            match self.get(prev_id) {
                Some(prev) => prev.next,
                None => return Err(ReserveError::InvalidHint { hint: prev_id }),
            }
        };

        order.prev = prev_id;
        order.next = next_id;
        let key = self.nodes.insert(order);
        self.index.insert(id, key);

        self.set_next(prev_id, id);
        if next_id != TAIL_ID {
            if let Some(next) = self.get_mut(next_id) {
                next.prev = id;
            }
        }

        Ok(())
    }

    /// Insert `order` at its sorted position. Returns the predecessor id.
    pub fn add_sorted(&mut self, order: Order) -> Result<OrderId> {
        let prev_id = self.find_insertion_point(order.src_qty, order.dst_qty);
        self.insert_after(prev_id, order)?;
        Ok(prev_id)
    }

    /// Insert `order` right after `hint`, failing if the hint is wrong.
    pub fn insert_with_hint(&mut self, hint: OrderId, order: Order) -> Result<()> {
        if !self.is_correct_hint(hint, order.src_qty, order.dst_qty) {
            return Err(ReserveError::InvalidHint { hint });
        }
        self.insert_after(hint, order)
    }

    /// Insert `order` using `hint` when it is correct, otherwise by scan.
    ///
    /// Returns true when the hint was used.
    pub fn add(&mut self, order: Order, hint: Option<OrderId>) -> Result<bool> {
        if let Some(hint) = hint {
            if self.is_correct_hint(hint, order.src_qty, order.dst_qty) {
                self.insert_after(hint, order)?;
                return Ok(true);
            }
            debug!(
                direction = ?self.direction,
                order_id = order.id,
                hint,
                "Invalid hint, falling back to full scan"
            );
        }

        self.add_sorted(order)?;
        Ok(false)
    }

    /// Splice an order out of the list.
    ///
    /// Returns the removed order with its links cleared, or `None` if `id`
    /// is not open. Sentinels are never removed.
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let key = self.index.remove(&id)?;
        let mut order = self.nodes.remove(key);

        self.set_next(order.prev, order.next);
        if order.next != TAIL_ID {
            if let Some(next) = self.get_mut(order.next) {
                next.prev = order.prev;
            }
        }

        order.prev = 0;
        order.next = 0;
        Some(order)
    }

    /// Overwrite an order's quantities in place, keeping its position.
    ///
    /// Only used for partial fills of the best order, which can only raise
    /// its rate.
    pub fn set_quantities(&mut self, id: OrderId, src_qty: Qty, dst_qty: Qty) -> bool {
        match self.get_mut(id) {
            Some(order) => {
                order.src_qty = src_qty;
                order.dst_qty = dst_qty;
                true
            }
            None => false,
        }
    }

    fn set_next(&mut self, id: OrderId, next: OrderId) {
        if id == HEAD_ID {
            self.head_next = next;
        } else if let Some(order) = self.get_mut(id) {
            order.next = next;
        }
    }

    // ========================================================================
    // Verification
    // ========================================================================

    /// Check links and sort order from head to tail
    pub fn is_sorted(&self) -> bool {
        let mut prev_id = HEAD_ID;
        let mut prev: Option<&Order> = None;
        let mut seen = 0;

        for order in self.iter() {
            if order.prev != prev_id {
                return false;
            }
            if let Some(better) = prev {
                let ord = compare_rates(order.src_qty, order.dst_qty, better.src_qty, better.dst_qty);
                if ord == Ordering::Greater {
                    return false;
                }
            }
            prev_id = order.id;
            prev = Some(order);
            seen += 1;
        }

        seen == self.len()
    }

    /// Feed the list, head to tail, into a state hasher
    pub fn absorb_into(&self, hasher: &mut StateHasher) {
        hasher.absorb_bytes(&[self.direction.to_u8()]);
        hasher.absorb_bytes(&(self.len() as u64).to_le_bytes());
        for order in self.iter() {
            hasher.absorb(order);
        }
    }
}

/// Iterator over a list, best order first.
pub struct Iter<'a> {
    list: &'a OrderList,
    cursor: OrderId,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == TAIL_ID {
            return None;
        }
        let order = self.list.get(self.cursor)?;
        self.cursor = order.next;
        Some(order)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
