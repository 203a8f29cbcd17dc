//! Maker order lifecycle: submit, update, cancel and their batch forms.
//!
//! ## Atomicity
//!
//! Every operation validates all of its preconditions before touching the
//! list, the ledger or the id pool. Batches run against a staged copy of
//! the reserve and are committed only when every entry succeeds.
//!
//! ## State Machine
//!
//! ```text
//! Open -> (partial fill) -> Open -> Removed
//! ```
//!
//! `Removed` is terminal; the order id goes back to the maker's pool.

use tracing::{debug, error, info};

use crate::economics::{is_valid_qty, is_valid_rate};
use crate::engine::OrderbookReserve;
use crate::error::{ReserveError, Result};
use crate::types::{Direction, MakerId, Order, OrderId, Qty};

/// Where a batched new order should be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HintSource {
    /// Find the position by scanning
    #[default]
    Scan,
    /// Use this order id as the hint
    Explicit(OrderId),
    /// Use the id of the previous order added by the same batch
    AfterPrevious,
}

/// One new order in [`add_order_batch`](OrderbookReserve::add_order_batch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRequest {
    pub direction: Direction,
    pub src_qty: Qty,
    pub dst_qty: Qty,
    pub hint: HintSource,
}

impl OrderRequest {
    /// A request positioned by scan
    pub fn new(direction: Direction, src_qty: Qty, dst_qty: Qty) -> Self {
        Self {
            direction,
            src_qty,
            dst_qty,
            hint: HintSource::Scan,
        }
    }

    /// Set the hint source
    pub fn with_hint(mut self, hint: HintSource) -> Self {
        self.hint = hint;
        self
    }
}

/// One change in [`update_order_batch`](OrderbookReserve::update_order_batch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderUpdate {
    pub direction: Direction,
    pub order_id: OrderId,
    pub new_src_qty: Qty,
    pub new_dst_qty: Qty,
    pub hint: Option<OrderId>,
}

impl OrderbookReserve {
    // ========================================================================
    // Validation
    // ========================================================================

    /// Check quantities, minimum size and rate of a prospective order.
    ///
    /// Returns the order's ETH leg.
    fn validate_order_qty(&self, direction: Direction, src_qty: Qty, dst_qty: Qty) -> Result<Qty> {
        if src_qty == 0 || dst_qty == 0 {
            return Err(ReserveError::InvalidQuantity("order quantity is zero"));
        }
        if !is_valid_qty(src_qty) || !is_valid_qty(dst_qty) {
            return Err(ReserveError::InvalidQuantity("order quantity exceeds maximum"));
        }

        let wei = direction.wei_leg(src_qty, dst_qty);
        if wei < self.limits.min_new_order_wei {
            return Err(ReserveError::InvalidQuantity("order below minimum size"));
        }

        let rate = self.taker_rate(direction, src_qty, dst_qty);
        if !is_valid_rate(rate) {
            return Err(ReserveError::InvalidRate { rate });
        }

        Ok(wei)
    }

    /// Check that `maker` can lock `new_total` notional
    fn check_stake_for(&self, maker: MakerId, new_total: Qty) -> Result<()> {
        let stake = self.ledger.funds(maker).map_or(0, |funds| funds.stake);
        let required = self.stake.required_stake(new_total);
        if stake < required {
            return Err(ReserveError::InsufficientStake {
                available: stake,
                required,
            });
        }
        Ok(())
    }

    /// Look up an order and check its owner
    fn owned_order(&self, maker: MakerId, direction: Direction, id: OrderId) -> Result<&Order> {
        let order = self
            .list(direction)
            .get(id)
            .ok_or(ReserveError::OrderNotFound { direction, id })?;
        if order.maker != maker {
            return Err(ReserveError::MakerMismatch { id, maker });
        }
        Ok(order)
    }

    // ========================================================================
    // Submit
    // ========================================================================

    /// Place a new maker order.
    ///
    /// The maker gives `src_qty` of `direction`'s source asset and wants
    /// `dst_qty` of its destination asset. Returns the allocated order id.
    ///
    /// # Errors
    ///
    /// `UnknownMaker`, `InvalidQuantity`, `InvalidRate`,
    /// `InsufficientBalance`, `InsufficientStake`, `OrderIdPoolExhausted`.
    /// A wrong `hint` is not an error; the position is found by scan.
    pub fn submit_order(
        &mut self,
        maker: MakerId,
        direction: Direction,
        src_qty: Qty,
        dst_qty: Qty,
        hint: Option<OrderId>,
    ) -> Result<OrderId> {
        let id = self
            .check_submit(maker, direction, src_qty, dst_qty)
            .inspect_err(|err| debug!(maker, ?direction, src_qty, dst_qty, %err, "Rejected submit"))?;

        let wei = direction.wei_leg(src_qty, dst_qty);
        self.list_mut(direction)
            .add(Order::new(id, maker, src_qty, dst_qty), hint)?;

        let account = self.ledger.account_mut(maker)?;
        let allocated = account.pool_mut(direction).allocate();
        debug_assert_eq!(allocated, Some(id), "pool handed out a different id");
        if allocated != Some(id) {
            error!(maker, ?direction, order_id = id, ?allocated, "Order id pool out of step with list");
        }
        *account.funds.balance_mut(direction.src_fund()) -= src_qty;
        account.funds.total_notional_locked += wei;

        info!(maker, ?direction, order_id = id, src_qty, dst_qty, "Order submitted");
        Ok(id)
    }

    /// All submit preconditions. Returns the id the order will get.
    fn check_submit(&self, maker: MakerId, direction: Direction, src_qty: Qty, dst_qty: Qty) -> Result<OrderId> {
        let account = self
            .ledger
            .account(maker)
            .ok_or(ReserveError::UnknownMaker(maker))?;

        let wei = self.validate_order_qty(direction, src_qty, dst_qty)?;

        let fund = direction.src_fund();
        let available = account.funds.balance(fund);
        if available < src_qty {
            return Err(ReserveError::InsufficientBalance {
                fund,
                available,
                required: src_qty,
            });
        }

        let new_total = account
            .funds
            .total_notional_locked
            .checked_add(wei)
            .ok_or(ReserveError::Overflow)?;
        self.check_stake_for(maker, new_total)?;

        account
            .pool(direction)
            .peek_free()
            .ok_or(ReserveError::OrderIdPoolExhausted { maker, direction })
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Change an open order's quantities and move it to its new position.
    ///
    /// Balance and stake are checked only for what the update adds;
    /// decreases always pass those checks.
    pub fn update_order(
        &mut self,
        maker: MakerId,
        direction: Direction,
        id: OrderId,
        new_src_qty: Qty,
        new_dst_qty: Qty,
        hint: Option<OrderId>,
    ) -> Result<()> {
        let old = self
            .check_update(maker, direction, id, new_src_qty, new_dst_qty, hint)
            .inspect_err(|err| debug!(maker, ?direction, order_id = id, %err, "Rejected update"))?;

        let old_wei = old.wei_amount(direction);
        let new_wei = direction.wei_leg(new_src_qty, new_dst_qty);

        let list = self.list_mut(direction);
        list.remove(id);
        list.add(Order::new(id, maker, new_src_qty, new_dst_qty), hint)?;

        let funds = self.ledger.funds_mut(maker)?;
        let balance = funds.balance_mut(direction.src_fund());
        *balance = *balance + old.src_qty - new_src_qty;
        funds.total_notional_locked = funds.total_notional_locked + new_wei - old_wei;

        info!(maker, ?direction, order_id = id, new_src_qty, new_dst_qty, "Order updated");
        Ok(())
    }

    /// All update preconditions. Returns a copy of the current order.
    fn check_update(
        &self,
        maker: MakerId,
        direction: Direction,
        id: OrderId,
        new_src_qty: Qty,
        new_dst_qty: Qty,
        hint: Option<OrderId>,
    ) -> Result<Order> {
        if hint == Some(id) {
            return Err(ReserveError::HintIsOrderId(id));
        }

        let old = self.owned_order(maker, direction, id)?.clone();
        let new_wei = self.validate_order_qty(direction, new_src_qty, new_dst_qty)?;
        let funds = self
            .ledger
            .funds(maker)
            .ok_or(ReserveError::UnknownMaker(maker))?;

        if new_src_qty > old.src_qty {
            let fund = direction.src_fund();
            let available = funds.balance(fund);
            let extra = new_src_qty - old.src_qty;
            if available < extra {
                return Err(ReserveError::InsufficientBalance {
                    fund,
                    available,
                    required: extra,
                });
            }
        }

        let old_wei = old.wei_amount(direction);
        if new_wei > old_wei {
            let new_total = funds
                .total_notional_locked
                .checked_add(new_wei - old_wei)
                .ok_or(ReserveError::Overflow)?;
            self.check_stake_for(maker, new_total)?;
        }

        Ok(old)
    }

    // ========================================================================
    // Cancel
    // ========================================================================

    /// Remove an open order and refund its locked source amount.
    pub fn cancel_order(&mut self, maker: MakerId, direction: Direction, id: OrderId) -> Result<()> {
        if let Err(err) = self.owned_order(maker, direction, id) {
            debug!(maker, ?direction, order_id = id, %err, "Rejected cancel");
            return Err(err);
        }

        let order = self
            .list_mut(direction)
            .remove(id)
            .ok_or(ReserveError::OrderNotFound { direction, id })?;

        let account = self.ledger.account_mut(maker)?;
        account.pool_mut(direction).release(id);
        *account.funds.balance_mut(direction.src_fund()) += order.src_qty;
        account.funds.total_notional_locked -= order.wei_amount(direction);

        info!(maker, ?direction, order_id = id, "Order cancelled");
        Ok(())
    }

    // ========================================================================
    // Hints
    // ========================================================================

    /// Id after which a new order with this rate would be placed
    pub fn get_add_order_hint(&self, direction: Direction, src_qty: Qty, dst_qty: Qty) -> OrderId {
        self.list(direction).find_insertion_point(src_qty, dst_qty)
    }

    /// Id after which order `id` would be placed with new quantities.
    ///
    /// The order itself is ignored, so the result is a valid update hint
    /// unless it is `HEAD_ID`.
    pub fn get_update_order_hint(
        &self,
        direction: Direction,
        id: OrderId,
        new_src_qty: Qty,
        new_dst_qty: Qty,
    ) -> Result<OrderId> {
        let list = self.list(direction);
        if !list.contains(id) {
            return Err(ReserveError::OrderNotFound { direction, id });
        }
        Ok(list.find_insertion_point_excluding(new_src_qty, new_dst_qty, id))
    }

    // ========================================================================
    // Batches
    // ========================================================================

    /// Submit several orders at once, all or nothing.
    ///
    /// Returns the new ids in request order. On failure the reserve is
    /// unchanged and the error names the failing entry.
    pub fn add_order_batch(&mut self, maker: MakerId, requests: &[OrderRequest]) -> Result<Vec<OrderId>> {
        let mut staged = self.clone();
        let mut ids = Vec::with_capacity(requests.len());
        let mut previous: Option<OrderId> = None;

        for (index, request) in requests.iter().enumerate() {
            let hint = match request.hint {
                HintSource::Scan => None,
                HintSource::Explicit(hint) => Some(hint),
                HintSource::AfterPrevious => previous,
            };

            let id = staged
                .submit_order(maker, request.direction, request.src_qty, request.dst_qty, hint)
                .map_err(|err| ReserveError::BatchFailed {
                    index,
                    source: Box::new(err),
                })?;
            ids.push(id);
            previous = Some(id);
        }

        *self = staged;
        info!(maker, count = ids.len(), "Order batch submitted");
        Ok(ids)
    }

    /// Update several orders at once, all or nothing.
    pub fn update_order_batch(&mut self, maker: MakerId, updates: &[OrderUpdate]) -> Result<()> {
        let mut staged = self.clone();

        for (index, update) in updates.iter().enumerate() {
            staged
                .update_order(
                    maker,
                    update.direction,
                    update.order_id,
                    update.new_src_qty,
                    update.new_dst_qty,
                    update.hint,
                )
                .map_err(|err| ReserveError::BatchFailed {
                    index,
                    source: Box::new(err),
                })?;
        }

        *self = staged;
        info!(maker, count = updates.len(), "Order batch updated");
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReserveConfig, NUM_ORDER_IDS, PRECISION};

    const ETH: Qty = PRECISION;
    const MAKER: MakerId = 1;

    fn funded() -> OrderbookReserve {
        let mut r = OrderbookReserve::new(ReserveConfig::default()).unwrap();
        r.deposit_ether(MAKER, 1_000 * ETH).unwrap();
        r.deposit_token(MAKER, 1_000_000 * ETH).unwrap();
        r.deposit_stake(MAKER, 10_000 * ETH).unwrap();
        r
    }

    #[test]
    fn test_submit_locks_funds() {
        let mut r = funded();
        let id = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 200 * ETH, None)
            .unwrap();

        assert_eq!(id, 3);
        let funds = r.maker_funds(MAKER).unwrap();
        assert_eq!(funds.ether, 998 * ETH);
        assert_eq!(funds.total_notional_locked, 2 * ETH);
        assert_eq!(r.maker_orders(MAKER, Direction::EthToToken), vec![3]);
    }

    #[test]
    fn test_submit_token_to_eth_locks_dst_leg() {
        let mut r = funded();
        r.submit_order(MAKER, Direction::TokenToEth, 900 * ETH, 3 * ETH, None)
            .unwrap();

        let funds = r.maker_funds(MAKER).unwrap();
        assert_eq!(funds.token, 1_000_000 * ETH - 900 * ETH);
        assert_eq!(funds.total_notional_locked, 3 * ETH);
    }

    #[test]
    fn test_submit_rejections_leave_state() {
        let mut r = funded();
        let root = r.state_root();

        // below minimum ETH leg
        let err = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH - 1, 200 * ETH, None)
            .unwrap_err();
        assert_eq!(err, ReserveError::InvalidQuantity("order below minimum size"));

        // balance
        let err = r
            .submit_order(MAKER, Direction::EthToToken, 1_001 * ETH, 200 * ETH, None)
            .unwrap_err();
        assert!(matches!(err, ReserveError::InsufficientBalance { .. }));

        // zero quantity
        let err = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 0, None)
            .unwrap_err();
        assert!(matches!(err, ReserveError::InvalidQuantity(_)));

        // rate above maximum: taker pays 1 unit for 2 ETH
        let err = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 1, None)
            .unwrap_err();
        assert!(matches!(err, ReserveError::InvalidRate { .. }));

        // unknown maker
        let err = r
            .submit_order(99, Direction::EthToToken, 2 * ETH, 200 * ETH, None)
            .unwrap_err();
        assert_eq!(err, ReserveError::UnknownMaker(99));

        assert_eq!(r.state_root(), root);
    }

    #[test]
    fn test_submit_pool_exhausted() {
        let mut r = funded();
        for _ in 0..NUM_ORDER_IDS {
            r.submit_order(MAKER, Direction::EthToToken, 2 * ETH, 200 * ETH, None)
                .unwrap();
        }

        let root = r.state_root();
        let err = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 200 * ETH, None)
            .unwrap_err();
        assert_eq!(
            err,
            ReserveError::OrderIdPoolExhausted {
                maker: MAKER,
                direction: Direction::EthToToken,
            }
        );
        assert_eq!(r.state_root(), root);

        // The other list has its own pool
        r.submit_order(MAKER, Direction::TokenToEth, 200 * ETH, 2 * ETH, None)
            .unwrap();
    }

    #[test]
    fn test_submit_ids_follow_pool() {
        let mut r = funded();
        let ids: Vec<OrderId> = (0..3)
            .map(|i| {
                r.submit_order(MAKER, Direction::EthToToken, 2 * ETH, (200 + i) * ETH, None)
                    .unwrap()
            })
            .collect();
        r.cancel_order(MAKER, Direction::EthToToken, ids[1]).unwrap();

        let pool = r.ledger().pool(MAKER, Direction::EthToToken).unwrap();
        assert_eq!(pool.peek_free(), Some(ids[1]));

        let reused = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 300 * ETH, None)
            .unwrap();
        assert_eq!(reused, ids[1]);

        let pool = r.ledger().pool(MAKER, Direction::EthToToken).unwrap();
        let mut listed = r.order_list(Direction::EthToToken);
        listed.sort_unstable();
        assert_eq!(pool.taken_ids(), listed);
        assert_eq!(pool.peek_free(), Some(ids[2] + 1));
    }

    #[test]
    fn test_submit_with_hint() {
        let mut r = funded();
        let a = r
            .submit_order(MAKER, Direction::EthToToken, 3 * ETH, 300 * ETH, None)
            .unwrap();
        let c = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 400 * ETH, None)
            .unwrap();

        let hint = r.get_add_order_hint(Direction::EthToToken, 2 * ETH, 300 * ETH);
        assert_eq!(hint, a);
        let b = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 300 * ETH, Some(hint))
            .unwrap();
        assert_eq!(r.order_list(Direction::EthToToken), vec![a, b, c]);

        // A wrong hint still lands in the right place
        let d = r
            .submit_order(MAKER, Direction::EthToToken, 10 * ETH, 100 * ETH, Some(c))
            .unwrap();
        assert_eq!(r.order_list(Direction::EthToToken), vec![d, a, b, c]);
    }

    #[test]
    fn test_update_moves_and_settles() {
        let mut r = funded();
        let a = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 200 * ETH, None)
            .unwrap();
        let b = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 400 * ETH, None)
            .unwrap();
        assert_eq!(r.order_list(Direction::EthToToken), vec![a, b]);

        // Make b the best order and bigger
        r.update_order(MAKER, Direction::EthToToken, b, 5 * ETH, 100 * ETH, None)
            .unwrap();
        assert_eq!(r.order_list(Direction::EthToToken), vec![b, a]);

        let funds = r.maker_funds(MAKER).unwrap();
        assert_eq!(funds.ether, 1_000 * ETH - 7 * ETH);
        assert_eq!(funds.total_notional_locked, 7 * ETH);

        // Shrink it back
        r.update_order(MAKER, Direction::EthToToken, b, 2 * ETH, 100 * ETH, None)
            .unwrap();
        let funds = r.maker_funds(MAKER).unwrap();
        assert_eq!(funds.ether, 996 * ETH);
        assert_eq!(funds.total_notional_locked, 4 * ETH);
    }

    #[test]
    fn test_update_rejections() {
        let mut r = funded();
        r.deposit_ether(2, 10 * ETH).unwrap();
        let a = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 200 * ETH, None)
            .unwrap();
        let root = r.state_root();

        assert_eq!(
            r.update_order(MAKER, Direction::EthToToken, a, 3 * ETH, 200 * ETH, Some(a)),
            Err(ReserveError::HintIsOrderId(a))
        );
        assert_eq!(
            r.update_order(2, Direction::EthToToken, a, 3 * ETH, 200 * ETH, None),
            Err(ReserveError::MakerMismatch { id: a, maker: 2 })
        );
        assert_eq!(
            r.update_order(MAKER, Direction::TokenToEth, a, 3 * ETH, 200 * ETH, None),
            Err(ReserveError::OrderNotFound {
                direction: Direction::TokenToEth,
                id: a,
            })
        );
        assert!(matches!(
            r.update_order(MAKER, Direction::EthToToken, a, ETH, 200 * ETH, None),
            Err(ReserveError::InvalidQuantity(_))
        ));
        assert!(matches!(
            r.update_order(MAKER, Direction::EthToToken, a, 1_001 * ETH, 200 * ETH, None),
            Err(ReserveError::InsufficientBalance { .. })
        ));

        assert_eq!(r.state_root(), root);
    }

    #[test]
    fn test_update_stake_checked_on_increase_only() {
        let mut r = OrderbookReserve::new(ReserveConfig::default()).unwrap();
        r.deposit_ether(MAKER, 100 * ETH).unwrap();
        // Exactly enough for 2 ETH of notional
        r.deposit_stake(MAKER, 7 * ETH).unwrap();

        let id = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 200 * ETH, None)
            .unwrap();

        let err = r
            .update_order(MAKER, Direction::EthToToken, id, 3 * ETH, 200 * ETH, None)
            .unwrap_err();
        assert!(matches!(err, ReserveError::InsufficientStake { .. }));

        // Same notional, new rate: no extra stake needed
        r.update_order(MAKER, Direction::EthToToken, id, 2 * ETH, 100 * ETH, None)
            .unwrap();
    }

    #[test]
    fn test_cancel_refunds_and_releases_id() {
        let mut r = funded();
        let id = r
            .submit_order(MAKER, Direction::TokenToEth, 500 * ETH, 2 * ETH, None)
            .unwrap();

        assert!(matches!(
            r.cancel_order(2, Direction::TokenToEth, id),
            Err(ReserveError::MakerMismatch { .. })
        ));

        r.cancel_order(MAKER, Direction::TokenToEth, id).unwrap();
        let funds = r.maker_funds(MAKER).unwrap();
        assert_eq!(funds.token, 1_000_000 * ETH);
        assert_eq!(funds.total_notional_locked, 0);
        assert!(r.maker_orders(MAKER, Direction::TokenToEth).is_empty());
        assert!(r.get_order(Direction::TokenToEth, id).is_none());

        // Second cancel finds nothing
        assert_eq!(
            r.cancel_order(MAKER, Direction::TokenToEth, id),
            Err(ReserveError::OrderNotFound {
                direction: Direction::TokenToEth,
                id,
            })
        );
    }

    #[test]
    fn test_update_hint_ignores_order_itself() {
        let mut r = funded();
        let a = r
            .submit_order(MAKER, Direction::EthToToken, 4 * ETH, 200 * ETH, None)
            .unwrap();
        let b = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 200 * ETH, None)
            .unwrap();
        let c = r
            .submit_order(MAKER, Direction::EthToToken, 2 * ETH, 400 * ETH, None)
            .unwrap();

        // Move a below c
        let hint = r
            .get_update_order_hint(Direction::EthToToken, a, 2 * ETH, 800 * ETH)
            .unwrap();
        assert_eq!(hint, c);
        r.update_order(MAKER, Direction::EthToToken, a, 2 * ETH, 800 * ETH, Some(hint))
            .unwrap();
        assert_eq!(r.order_list(Direction::EthToToken), vec![b, c, a]);

        assert!(r.get_update_order_hint(Direction::EthToToken, 99, 1, 1).is_err());
    }

    #[test]
    fn test_add_batch_after_previous() {
        let mut r = funded();
        let requests = [
            OrderRequest::new(Direction::EthToToken, 3 * ETH, 300 * ETH),
            OrderRequest::new(Direction::EthToToken, 2 * ETH, 300 * ETH)
                .with_hint(HintSource::AfterPrevious),
            OrderRequest::new(Direction::TokenToEth, 300 * ETH, 2 * ETH),
        ];

        let ids = r.add_order_batch(MAKER, &requests).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(r.order_list(Direction::EthToToken), vec![ids[0], ids[1]]);
        assert_eq!(r.order_list(Direction::TokenToEth), vec![ids[2]]);
        assert_eq!(r.maker_total_orders_wei(MAKER), 7 * ETH);
    }

    #[test]
    fn test_add_batch_is_atomic() {
        let mut r = funded();
        let root = r.state_root();
        let requests = [
            OrderRequest::new(Direction::EthToToken, 3 * ETH, 300 * ETH),
            OrderRequest::new(Direction::EthToToken, ETH, 300 * ETH),
        ];

        let err = r.add_order_batch(MAKER, &requests).unwrap_err();
        match err {
            ReserveError::BatchFailed { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, ReserveError::InvalidQuantity(_)));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(r.state_root(), root);
        assert!(r.order_list(Direction::EthToToken).is_empty());
    }

    #[test]
    fn test_update_batch() {
        let mut r = funded();
        let ids = r
            .add_order_batch(
                MAKER,
                &[
                    OrderRequest::new(Direction::EthToToken, 2 * ETH, 200 * ETH),
                    OrderRequest::new(Direction::EthToToken, 2 * ETH, 300 * ETH),
                ],
            )
            .unwrap();

        let update = |order_id, new_dst_qty| OrderUpdate {
            direction: Direction::EthToToken,
            order_id,
            new_src_qty: 2 * ETH,
            new_dst_qty,
            hint: None,
        };

        r.update_order_batch(MAKER, &[update(ids[0], 400 * ETH), update(ids[1], 100 * ETH)])
            .unwrap();
        assert_eq!(r.order_list(Direction::EthToToken), vec![ids[1], ids[0]]);

        let root = r.state_root();
        let err = r
            .update_order_batch(MAKER, &[update(ids[0], 50 * ETH), update(77, 50 * ETH)])
            .unwrap_err();
        assert!(matches!(err, ReserveError::BatchFailed { index: 1, .. }));
        assert_eq!(r.state_root(), root);
    }
}
