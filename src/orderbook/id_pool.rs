//! Per-maker order id pools.
//!
//! Each maker owns a contiguous block of `NUM_ORDER_IDS` ids per list.
//! A 32-bit bitmap tracks which ids are taken. Allocation always returns
//! the lowest free id, so recycling is deterministic.

use ssz_rs::prelude::*;

use crate::config::NUM_ORDER_IDS;
use crate::types::OrderId;

/// A maker's block of order ids for one list.
///
/// ## Example
///
/// ```
/// use orderbook_reserve::orderbook::OrderIdPool;
///
/// let mut pool = OrderIdPool::new(3);
/// assert_eq!(pool.allocate(), Some(3));
/// assert_eq!(pool.allocate(), Some(4));
///
/// assert!(pool.release(3));
/// assert_eq!(pool.allocate(), Some(3)); // lowest free id is reused
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct OrderIdPool {
    /// First id of the block
    pub first_id: u32,

    /// Bit `i` set means `first_id + i` is taken
    pub taken_bitmap: u32,
}

impl OrderIdPool {
    /// Create an empty pool starting at `first_id`
    pub fn new(first_id: OrderId) -> Self {
        Self {
            first_id,
            taken_bitmap: 0,
        }
    }

    /// Check whether `id` belongs to this pool
    #[inline]
    pub fn contains(&self, id: OrderId) -> bool {
        id >= self.first_id && id - self.first_id < NUM_ORDER_IDS
    }

    /// Check whether `id` is currently allocated
    #[inline]
    pub fn is_taken(&self, id: OrderId) -> bool {
        self.contains(id) && self.taken_bitmap & (1 << (id - self.first_id)) != 0
    }

    /// Lowest free id without allocating it
    #[inline]
    pub fn peek_free(&self) -> Option<OrderId> {
        let offset = (!self.taken_bitmap).trailing_zeros();
        (offset < NUM_ORDER_IDS).then(|| self.first_id + offset)
    }

    /// Allocate the lowest free id, or `None` when exhausted
    pub fn allocate(&mut self) -> Option<OrderId> {
        let id = self.peek_free()?;
        self.taken_bitmap |= 1 << (id - self.first_id);
        Some(id)
    }

    /// Return an id to the pool.
    ///
    /// Returns false if the id is outside the pool or was not taken.
    pub fn release(&mut self, id: OrderId) -> bool {
        if !self.is_taken(id) {
            return false;
        }
        self.taken_bitmap &= !(1 << (id - self.first_id));
        true
    }

    /// Number of allocated ids
    #[inline]
    pub fn taken_count(&self) -> u32 {
        self.taken_bitmap.count_ones()
    }

    /// All allocated ids, ascending
    pub fn taken_ids(&self) -> Vec<OrderId> {
        (0..NUM_ORDER_IDS)
            .filter(|offset| self.taken_bitmap & (1 << offset) != 0)
            .map(|offset| self.first_id + offset)
            .collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
