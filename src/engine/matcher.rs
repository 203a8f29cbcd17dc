//! Taker matching: quotes and atomic trades.
//!
//! ## Matching Rules
//!
//! A taker request in one direction is filled from the maker list of the
//! opposite direction, best order first, consuming at most
//! `max_orders_per_trade` orders:
//!
//! - If an order wants less than the taker still has to pay, the whole
//!   order is taken
//! - Otherwise the taker takes `remaining * src / dst` (floored) of it and
//!   the walk stops
//!
//! ## Two Passes
//!
//! `trade` first walks the book read-only (the same walk `quote` does).
//! Only when that plan covers the whole request at an acceptable rate is
//! the second, mutating pass applied. Nothing in the mutating pass can
//! fail, so a rejected trade never changes state.

use tracing::{debug, error, info, trace};

use crate::config::MAX_QTY;
use crate::economics::calc_rate_from_qty;
use crate::engine::OrderbookReserve;
use crate::error::{ReserveError, Result};
use crate::types::{Direction, Fill, FundKind, MakerId, OrderId, Qty, TradeReceipt};

/// One order touched by a planned trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Take {
    order_id: OrderId,

    /// Part of the order's `dst_qty` the taker pays
    taker_paid: Qty,

    /// Part of the order's `src_qty` the taker receives
    taker_received: Qty,

    /// The whole order is consumed
    full: bool,
}

/// Result of the read-only walk.
#[derive(Debug, Clone, Default)]
struct MatchPlan {
    takes: Vec<Take>,
    dst_amount: Qty,
    remaining: Qty,
}

impl OrderbookReserve {
    // ========================================================================
    // Quote
    // ========================================================================

    /// Walk the book for a taker paying `src_qty` in `direction`.
    fn plan_match(&self, direction: Direction, src_qty: Qty) -> MatchPlan {
        let list = self.list(direction.opposite());
        let max_orders = self.limits.max_orders_per_trade as usize;

        let mut plan = MatchPlan {
            takes: Vec::with_capacity(max_orders.min(list.len())),
            dst_amount: 0,
            remaining: src_qty,
        };

        for order in list.iter().take(max_orders) {
            if plan.remaining == 0 {
                break;
            }

            if order.dst_qty <= plan.remaining {
                plan.remaining -= order.dst_qty;
                plan.dst_amount += order.src_qty;
                plan.takes.push(Take {
                    order_id: order.id,
                    taker_paid: order.dst_qty,
                    taker_received: order.src_qty,
                    full: true,
                });
            } else {
                // remaining < dst_qty, so the partial amount is < src_qty
                let received = partial_amount(plan.remaining, order.src_qty, order.dst_qty);
                plan.dst_amount += received;
                plan.takes.push(Take {
                    order_id: order.id,
                    taker_paid: plan.remaining,
                    taker_received: received,
                    full: false,
                });
                plan.remaining = 0;
            }
        }

        plan
    }

    /// Rate a taker would get paying `src_qty` in `direction`, scaled by
    /// PRECISION.
    ///
    /// Returns 0 when the book cannot fill the whole amount within
    /// `max_orders_per_trade` orders, when it would pay out nothing, or
    /// when `src_qty` is zero or above `MAX_QTY`.
    pub fn quote(&self, direction: Direction, src_qty: Qty) -> u128 {
        if src_qty == 0 || src_qty > MAX_QTY {
            return 0;
        }

        let plan = self.plan_match(direction, src_qty);
        if plan.remaining != 0 || plan.dst_amount == 0 {
            return 0;
        }

        self.rate_for(direction, src_qty, plan.dst_amount)
    }

    fn rate_for(&self, direction: Direction, src_qty: Qty, dst_amount: Qty) -> u128 {
        calc_rate_from_qty(
            src_qty,
            dst_amount,
            self.decimals(direction.src_fund()),
            self.decimals(direction.dst_fund()),
        )
    }

    /// Router entry point for rate discovery.
    ///
    /// Returns 0 for unsupported pairs, while trading is disabled or
    /// blocked by the stake rate, and whenever [`quote`](Self::quote) would.
    pub fn get_conversion_rate(&self, src: FundKind, dst: FundKind, src_qty: Qty) -> u128 {
        let Some(direction) = Direction::from_assets(src, dst) else {
            return 0;
        };
        if !self.trade_enabled || self.stake.rate_blocks_trade() {
            return 0;
        }
        self.quote(direction, src_qty)
    }

    // ========================================================================
    // Trade
    // ========================================================================

    /// Execute a taker trade atomically.
    ///
    /// # Arguments
    ///
    /// * `src` - Asset the taker pays
    /// * `src_qty` - Amount the taker pays
    /// * `dst` - Asset the taker receives
    /// * `dest` - Account the router credits with the proceeds
    /// * `min_rate` - Lowest acceptable rate, scaled by PRECISION
    ///
    /// # Errors
    ///
    /// `TradeDisabled`, `UnsupportedPair`, `InvalidQuantity`,
    /// `InsufficientLiquidity`, `RateSlippage`. On error nothing changed.
    pub fn trade(
        &mut self,
        src: FundKind,
        src_qty: Qty,
        dst: FundKind,
        dest: MakerId,
        min_rate: u128,
    ) -> Result<TradeReceipt> {
        let (direction, plan, rate) = self
            .check_trade(src, src_qty, dst, min_rate)
            .inspect_err(|err| debug!(?src, ?dst, src_qty, min_rate, %err, "Rejected trade"))?;

        let maker_list = direction.opposite();
        let mut fills = Vec::with_capacity(plan.takes.len());
        let mut burned = 0;

        for take in &plan.takes {
            let fill = self.apply_take(maker_list, take);
            trace!(
                order_id = fill.order_id,
                maker = fill.maker,
                taker_paid = fill.taker_paid,
                taker_received = fill.taker_received,
                burned = fill.burned,
                removed = fill.removed,
                "Fill"
            );
            burned += fill.burned;
            fills.push(fill);
        }

        let trade_id = self.next_trade_id;
        self.next_trade_id += 1;

        info!(
            trade_id,
            ?direction,
            src_qty,
            dst_amount = plan.dst_amount,
            orders = fills.len(),
            burned,
            "Trade executed"
        );

        Ok(TradeReceipt {
            trade_id,
            direction,
            src_qty,
            dst_amount: plan.dst_amount,
            rate,
            burned,
            dest,
            fills,
            state_root: self.state_root(),
        })
    }

    /// Every trade precondition, including the dry-run walk
    fn check_trade(
        &self,
        src: FundKind,
        src_qty: Qty,
        dst: FundKind,
        min_rate: u128,
    ) -> Result<(Direction, MatchPlan, u128)> {
        if !self.trade_enabled || self.stake.rate_blocks_trade() {
            return Err(ReserveError::TradeDisabled);
        }
        let direction =
            Direction::from_assets(src, dst).ok_or(ReserveError::UnsupportedPair { src, dst })?;

        if src_qty == 0 {
            return Err(ReserveError::InvalidQuantity("trade amount is zero"));
        }
        if src_qty > MAX_QTY {
            return Err(ReserveError::InvalidQuantity("trade amount exceeds maximum"));
        }

        let plan = self.plan_match(direction, src_qty);
        if plan.remaining != 0 {
            return Err(ReserveError::InsufficientLiquidity {
                remaining: plan.remaining,
            });
        }
        if plan.dst_amount == 0 {
            return Err(ReserveError::InsufficientLiquidity { remaining: src_qty });
        }

        let rate = self.rate_for(direction, src_qty, plan.dst_amount);
        if rate < min_rate {
            return Err(ReserveError::RateSlippage {
                realized: rate,
                minimum: min_rate,
            });
        }

        Ok((direction, plan, rate))
    }

    /// Apply one planned take to the book and the maker's funds.
    ///
    /// The maker is credited `taker_paid` in the asset it wanted, its
    /// notional shrinks by the filled ETH leg, and stake is burned for that
    /// leg, never below what its remaining orders require. A partial
    /// remainder below `min_order_wei` is removed and its source amount
    /// refunded.
    fn apply_take(&mut self, maker_list: Direction, take: &Take) -> Fill {
        let min_order_wei = self.limits.min_order_wei;
        let stake_model = self.stake;
        let list = self.list_mut(maker_list);

        debug_assert!(
            list.contains(take.order_id),
            "planned order {} is not on the list",
            take.order_id
        );
        let Some(order) = list.get(take.order_id).cloned() else {
            error!(order_id = take.order_id, ?maker_list, "Planned order missing, fill skipped");
            return Fill::new(take.order_id, 0, take.taker_paid, take.taker_received, 0, false);
        };
        let order_wei = order.wei_amount(maker_list);

        let (released_wei, burn_wei, refund, removed) = if take.full {
            list.remove(order.id);
            (order_wei, order_wei, 0, true)
        } else {
            let rem_src = order.src_qty - take.taker_received;
            let rem_dst = order.dst_qty - take.taker_paid;
            let rem_wei = maker_list.wei_leg(rem_src, rem_dst);

            if rem_wei < min_order_wei {
                list.remove(order.id);
                (order_wei, order_wei - rem_wei, rem_src, true)
            } else {
                list.set_quantities(order.id, rem_src, rem_dst);
                (order_wei - rem_wei, order_wei - rem_wei, 0, false)
            }
        };

        debug_assert!(
            self.ledger.account(order.maker).is_some(),
            "maker {} of order {} has no account",
            order.maker,
            order.id
        );
        let Ok(account) = self.ledger.account_mut(order.maker) else {
            error!(order_id = order.id, maker = order.maker, "Maker account missing, fill not settled");
            return Fill::new(order.id, order.maker, take.taker_paid, take.taker_received, 0, removed);
        };

        if removed {
            account.pool_mut(maker_list).release(order.id);
        }

        let funds = &mut account.funds;
        let received = funds.balance_mut(maker_list.dst_fund());
        *received = received.saturating_add(take.taker_paid);
        let refunded = funds.balance_mut(maker_list.src_fund());
        *refunded = refunded.saturating_add(refund);
        funds.total_notional_locked = funds.total_notional_locked.saturating_sub(released_wei);

        let burned = stake_model.capped_burn(funds, burn_wei);
        funds.stake -= burned;

        Fill::new(order.id, order.maker, take.taker_paid, take.taker_received, burned, removed)
    }
}

/// `remaining * src / dst`, floored, with a 256-bit intermediate
fn partial_amount(remaining: Qty, src_qty: Qty, dst_qty: Qty) -> Qty {
    use alloy_primitives::U256;

    let amount = U256::from(remaining) * U256::from(src_qty) / U256::from(dst_qty);
    u128::try_from(amount).unwrap_or(Qty::MAX)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReserveConfig, PRECISION, TAIL_ID};
    use crate::economics::burn_amount;

    const ETH: Qty = PRECISION;

    fn reserve_with_makers() -> OrderbookReserve {
        let mut r = OrderbookReserve::new(ReserveConfig::default()).unwrap();
        for maker in 1..=3 {
            r.deposit_ether(maker, 1_000 * ETH).unwrap();
            r.deposit_token(maker, 1_000_000 * ETH).unwrap();
            r.deposit_stake(maker, 10_000 * ETH).unwrap();
        }
        r
    }

    #[test]
    fn test_quote_single_full_order() {
        let mut r = reserve_with_makers();
        // Maker sells 1000 tokens for 4 ETH
        r.submit_order(1, Direction::TokenToEth, 1_000 * ETH, 4 * ETH, None)
            .unwrap();

        // Taker pays 4 ETH, gets 1000 tokens: rate 250
        assert_eq!(r.quote(Direction::EthToToken, 4 * ETH), 250 * ETH);
        assert_eq!(
            r.get_conversion_rate(FundKind::Ether, FundKind::Token, 4 * ETH),
            250 * ETH
        );
    }

    #[test]
    fn test_quote_partial_order() {
        let mut r = reserve_with_makers();
        r.submit_order(1, Direction::TokenToEth, 1_000 * ETH, 4 * ETH, None)
            .unwrap();

        assert_eq!(r.quote(Direction::EthToToken, ETH), 250 * ETH);
    }

    #[test]
    fn test_quote_walks_best_first() {
        let mut r = reserve_with_makers();
        // 300 tokens per ETH and 200 tokens per ETH
        r.submit_order(1, Direction::TokenToEth, 400 * ETH, 2 * ETH, None)
            .unwrap();
        r.submit_order(2, Direction::TokenToEth, 600 * ETH, 2 * ETH, None)
            .unwrap();

        // 2 ETH all from the better order
        assert_eq!(r.quote(Direction::EthToToken, 2 * ETH), 300 * ETH);
        // 4 ETH: 600 + 400 tokens
        assert_eq!(r.quote(Direction::EthToToken, 4 * ETH), 250 * ETH);
        // 5 ETH: more than the book holds
        assert_eq!(r.quote(Direction::EthToToken, 5 * ETH), 0);
    }

    #[test]
    fn test_quote_zero_cases() {
        let mut r = reserve_with_makers();
        assert_eq!(r.quote(Direction::EthToToken, ETH), 0);

        r.submit_order(1, Direction::TokenToEth, 1_000 * ETH, 4 * ETH, None)
            .unwrap();
        assert_eq!(r.quote(Direction::EthToToken, 0), 0);
        assert_eq!(r.quote(Direction::EthToToken, MAX_QTY + 1), 0);
        // 1 wei still buys 250 token units
        assert_eq!(r.quote(Direction::EthToToken, 1), 250 * ETH);

        assert_eq!(r.get_conversion_rate(FundKind::Stake, FundKind::Token, ETH), 0);
        assert_eq!(r.get_conversion_rate(FundKind::Ether, FundKind::Ether, ETH), 0);

        r.set_trade_enabled(false);
        assert_eq!(r.get_conversion_rate(FundKind::Ether, FundKind::Token, ETH), 0);
        // quote ignores the switch
        assert_eq!(r.quote(Direction::EthToToken, ETH), 250 * ETH);
    }

    #[test]
    fn test_quote_respects_max_orders() {
        let mut r = reserve_with_makers();
        r.set_max_orders_per_trade(2).unwrap();
        for _ in 0..3 {
            r.submit_order(1, Direction::TokenToEth, 200 * ETH, 2 * ETH, None)
                .unwrap();
        }

        assert_eq!(r.quote(Direction::EthToToken, 4 * ETH), 100 * ETH);
        assert_eq!(r.quote(Direction::EthToToken, 5 * ETH), 0);
    }

    #[test]
    fn test_trade_full_fill_pays_maker_and_burns() {
        let mut r = reserve_with_makers();
        let id = r
            .submit_order(1, Direction::TokenToEth, 1_000 * ETH, 4 * ETH, None)
            .unwrap();
        let stake_before = r.maker_funds(1).unwrap().stake;

        let receipt = r
            .trade(FundKind::Ether, 4 * ETH, FundKind::Token, 42, 250 * ETH)
            .unwrap();

        assert_eq!(receipt.trade_id, 1);
        assert_eq!(receipt.dst_amount, 1_000 * ETH);
        assert_eq!(receipt.rate, 250 * ETH);
        assert_eq!(receipt.dest, 42);
        assert_eq!(receipt.orders_taken(), 1);
        assert_eq!(receipt.orders_removed(), 1);
        assert_eq!(receipt.fills[0].order_id, id);
        assert_eq!(receipt.state_root, r.state_root());

        let expected_burn = burn_amount(4 * ETH, 25, 280 * ETH);
        assert_eq!(receipt.burned, expected_burn);

        let funds = r.maker_funds(1).unwrap();
        assert_eq!(funds.ether, 1_004 * ETH);
        assert_eq!(funds.total_notional_locked, 0);
        assert_eq!(funds.stake, stake_before - expected_burn);
        assert_eq!(r.first_order_id(Direction::TokenToEth), TAIL_ID);
        assert!(r.maker_orders(1, Direction::TokenToEth).is_empty());
    }

    #[test]
    fn test_trade_partial_fill_keeps_order() {
        let mut r = reserve_with_makers();
        let id = r
            .submit_order(1, Direction::TokenToEth, 1_000 * ETH, 4 * ETH, None)
            .unwrap();

        let receipt = r
            .trade(FundKind::Ether, ETH, FundKind::Token, 42, 0)
            .unwrap();
        assert_eq!(receipt.dst_amount, 250 * ETH);
        assert_eq!(receipt.orders_removed(), 0);

        let order = r.get_order(Direction::TokenToEth, id).unwrap();
        assert_eq!(order.src_qty, 750 * ETH);
        assert_eq!(order.dst_qty, 3 * ETH);

        let funds = r.maker_funds(1).unwrap();
        assert_eq!(funds.ether, 1_001 * ETH);
        assert_eq!(funds.total_notional_locked, 3 * ETH);
    }

    #[test]
    fn test_trade_partial_dust_removed_and_refunded() {
        let mut r = reserve_with_makers();
        let id = r
            .submit_order(1, Direction::TokenToEth, 1_000 * ETH, 4 * ETH, None)
            .unwrap();
        let tokens_after_submit = r.maker_funds(1).unwrap().token;

        // Leaves 0.5 ETH, below the 1 ETH order minimum
        let receipt = r
            .trade(FundKind::Ether, 35 * ETH / 10, FundKind::Token, 42, 0)
            .unwrap();
        assert_eq!(receipt.orders_removed(), 1);
        assert_eq!(receipt.dst_amount, 875 * ETH);
        assert!(r.get_order(Direction::TokenToEth, id).is_none());

        let funds = r.maker_funds(1).unwrap();
        assert_eq!(funds.token, tokens_after_submit + 125 * ETH);
        assert_eq!(funds.ether, 1_000 * ETH + 35 * ETH / 10);
        assert_eq!(funds.total_notional_locked, 0);
        assert_eq!(receipt.burned, burn_amount(35 * ETH / 10, 25, 280 * ETH));
    }

    #[test]
    fn test_trade_rejections_leave_state() {
        let mut r = reserve_with_makers();
        r.submit_order(1, Direction::TokenToEth, 1_000 * ETH, 4 * ETH, None)
            .unwrap();
        let root = r.state_root();

        assert_eq!(
            r.trade(FundKind::Ether, 5 * ETH, FundKind::Token, 42, 0),
            Err(ReserveError::InsufficientLiquidity { remaining: ETH })
        );
        assert_eq!(
            r.trade(FundKind::Ether, ETH, FundKind::Token, 42, 251 * ETH),
            Err(ReserveError::RateSlippage {
                realized: 250 * ETH,
                minimum: 251 * ETH,
            })
        );
        assert_eq!(
            r.trade(FundKind::Token, ETH, FundKind::Stake, 42, 0),
            Err(ReserveError::UnsupportedPair {
                src: FundKind::Token,
                dst: FundKind::Stake,
            })
        );
        assert!(matches!(
            r.trade(FundKind::Ether, 0, FundKind::Token, 42, 0),
            Err(ReserveError::InvalidQuantity(_))
        ));

        r.set_trade_enabled(false);
        assert_eq!(
            r.trade(FundKind::Ether, ETH, FundKind::Token, 42, 0),
            Err(ReserveError::TradeDisabled)
        );
        r.set_trade_enabled(true);

        assert_eq!(r.state_root(), root);
    }

    #[test]
    fn test_trade_blocked_by_stake_rate() {
        let mut r = reserve_with_makers();
        r.submit_order(1, Direction::TokenToEth, 1_000 * ETH, 4 * ETH, None)
            .unwrap();

        r.set_current_knc_rate(280 * 5 * ETH + 1).unwrap();
        assert_eq!(
            r.trade(FundKind::Ether, ETH, FundKind::Token, 42, 0),
            Err(ReserveError::TradeDisabled)
        );
        assert_eq!(r.get_conversion_rate(FundKind::Ether, FundKind::Token, ETH), 0);
    }

    #[test]
    fn test_trade_burn_capped_at_stake() {
        let mut r = OrderbookReserve::new(ReserveConfig::default()).unwrap();
        r.deposit_token(1, 1_000 * ETH).unwrap();
        r.deposit_stake(1, 14 * ETH).unwrap();
        r.submit_order(1, Direction::TokenToEth, 1_000 * ETH, 4 * ETH, None)
            .unwrap();

        // Burn at the live rate would be 15 stake tokens, more than the maker has
        r.set_knc_per_eth_base_rate(300 * ETH).unwrap();
        r.set_current_knc_rate(1_500 * ETH).unwrap();
        assert_eq!(r.stake_model().burn_on_fill(4 * ETH), 15 * ETH);

        let receipt = r
            .trade(FundKind::Ether, 4 * ETH, FundKind::Token, 42, 0)
            .unwrap();
        assert_eq!(receipt.burned, 14 * ETH);
        assert_eq!(r.maker_funds(1).unwrap().stake, 0);
    }

    #[test]
    fn test_trade_at_rate_limit_keeps_collateral() {
        let mut r = OrderbookReserve::new(ReserveConfig::default()).unwrap();
        let qty = 4 * ETH + 7;
        let stake = r.stake_model().required_stake(qty);
        r.deposit_ether(1, qty).unwrap();
        r.deposit_stake(1, stake).unwrap();
        r.submit_order(1, Direction::EthToToken, qty, qty, None).unwrap();

        // Highest live rate that still allows trading
        r.set_current_knc_rate(5 * 280 * ETH).unwrap();
        assert!(!r.knc_rate_blocks_trade());

        let receipt = r
            .trade(FundKind::Token, ETH + 1, FundKind::Ether, 9, 0)
            .unwrap();
        assert_eq!(receipt.orders_removed(), 0);
        assert!(receipt.burned < r.stake_model().burn_on_fill(ETH + 1));

        let funds = r.maker_funds(1).unwrap();
        assert_eq!(funds.total_notional_locked, 3 * ETH + 6);
        assert_eq!(funds.stake, stake - receipt.burned);
        assert!(funds.stake >= r.stake_model().required_stake(funds.total_notional_locked));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "is not on the list")]
    fn test_apply_take_missing_order_panics() {
        let mut r = reserve_with_makers();
        let take = Take {
            order_id: 40,
            taker_paid: ETH,
            taker_received: ETH,
            full: true,
        };
        r.apply_take(Direction::TokenToEth, &take);
    }

    #[test]
    fn test_trade_token_to_eth_direction() {
        let mut r = reserve_with_makers();
        // Maker gives 3 ETH for 600 tokens
        r.submit_order(2, Direction::EthToToken, 3 * ETH, 600 * ETH, None)
            .unwrap();

        let receipt = r
            .trade(FundKind::Token, 600 * ETH, FundKind::Ether, 7, 0)
            .unwrap();
        assert_eq!(receipt.direction, Direction::TokenToEth);
        assert_eq!(receipt.dst_amount, 3 * ETH);
        assert_eq!(receipt.rate, ETH / 200);

        let funds = r.maker_funds(2).unwrap();
        assert_eq!(funds.token, 1_000_000 * ETH + 600 * ETH);
        assert_eq!(funds.ether, 997 * ETH);
    }

    #[test]
    fn test_trade_ids_increase() {
        let mut r = reserve_with_makers();
        r.submit_order(1, Direction::TokenToEth, 1_000 * ETH, 4 * ETH, None)
            .unwrap();

        let first = r.trade(FundKind::Ether, ETH, FundKind::Token, 1, 0).unwrap();
        let second = r.trade(FundKind::Ether, ETH, FundKind::Token, 1, 0).unwrap();
        assert_eq!(first.trade_id + 1, second.trade_id);
        assert_ne!(first.state_root, second.state_root);
    }

    #[test]
    fn test_partial_amount_floors() {
        assert_eq!(partial_amount(1, 2, 3), 0);
        assert_eq!(partial_amount(2, 2, 3), 1);
        assert_eq!(partial_amount(MAX_QTY, MAX_QTY, MAX_QTY), MAX_QTY);
    }
}
