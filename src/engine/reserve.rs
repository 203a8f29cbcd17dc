//! The reserve: both order lists, the maker ledger and the economic
//! parameters, behind one owning struct.
//!
//! Maker funding, administration and read-only views live here. Order
//! lifecycle operations are in [`lifecycle`](super::lifecycle) and taker
//! matching in [`matcher`](super::matcher).

use tracing::{debug, info};

use crate::config::{ReserveConfig, ETH_DECIMALS, MAX_BURN_FEE_BPS, MAX_RATE};
use crate::economics::{calc_rate_from_qty, OrderLimits, StakeModel};
use crate::error::{ConfigError, ReserveError, Result};
use crate::ledger::MakerLedger;
use crate::orderbook::OrderList;
use crate::types::{
    Direction, FundKind, MakerFunds, MakerId, Order, OrderId, Qty, StateHasher,
};

/// Staked limit-order reserve for one ETH/token pair.
///
/// Every public operation either applies completely or returns an error
/// and leaves the reserve untouched.
///
/// # Example
///
/// ```
/// use orderbook_reserve::{OrderbookReserve, ReserveConfig};
/// use orderbook_reserve::types::{Direction, FundKind};
///
/// const ETH: u128 = 1_000_000_000_000_000_000;
///
/// let mut reserve = OrderbookReserve::new(ReserveConfig::default()).unwrap();
/// reserve.deposit(1, FundKind::Ether, 10 * ETH).unwrap();
/// reserve.deposit(1, FundKind::Stake, 100 * ETH).unwrap();
///
/// let id = reserve
///     .submit_order(1, Direction::EthToToken, 2 * ETH, 1_000 * ETH, None)
///     .unwrap();
/// assert_eq!(reserve.order_list(Direction::EthToToken), vec![id]);
/// assert_eq!(reserve.maker_total_orders_wei(1), 2 * ETH);
/// ```
#[derive(Debug, Clone)]
pub struct OrderbookReserve {
    pub(crate) config: ReserveConfig,
    pub(crate) limits: OrderLimits,
    pub(crate) stake: StakeModel,

    /// Maker lists, indexed by [`Direction::index`]
    pub(crate) lists: [OrderList; 2],
    pub(crate) ledger: MakerLedger,

    pub(crate) trade_enabled: bool,
    pub(crate) next_trade_id: u64,
}

impl OrderbookReserve {
    /// Create an empty reserve from validated configuration
    pub fn new(config: ReserveConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            limits: OrderLimits::new(config.min_new_order_wei, config.max_orders_per_trade),
            stake: StakeModel::from_config(&config),
            lists: [
                OrderList::with_capacity(Direction::EthToToken, 256),
                OrderList::with_capacity(Direction::TokenToEth, 256),
            ],
            ledger: MakerLedger::new(),
            trade_enabled: true,
            next_trade_id: 1,
            config,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Construction parameters
    #[inline]
    pub fn config(&self) -> &ReserveConfig {
        &self.config
    }

    /// Current order size limits
    #[inline]
    pub fn limits(&self) -> &OrderLimits {
        &self.limits
    }

    /// Current stake parameters
    #[inline]
    pub fn stake_model(&self) -> &StakeModel {
        &self.stake
    }

    /// Maker list for one direction
    #[inline]
    pub fn list(&self, direction: Direction) -> &OrderList {
        &self.lists[direction.index()]
    }

    #[inline]
    pub(crate) fn list_mut(&mut self, direction: Direction) -> &mut OrderList {
        &mut self.lists[direction.index()]
    }

    /// Maker ledger
    #[inline]
    pub fn ledger(&self) -> &MakerLedger {
        &self.ledger
    }

    /// Whether takers may trade
    #[inline]
    pub fn trade_enabled(&self) -> bool {
        self.trade_enabled
    }

    /// Decimals of a tradeable fund
    #[inline]
    pub fn decimals(&self, fund: FundKind) -> u32 {
        match fund {
            FundKind::Token => self.config.token_decimals,
            FundKind::Ether | FundKind::Stake => ETH_DECIMALS,
        }
    }

    /// Rate a taker gets from a maker order resting in `direction`'s list.
    ///
    /// The taker pays the order's `dst_qty` and receives its `src_qty`.
    pub fn taker_rate(&self, direction: Direction, src_qty: Qty, dst_qty: Qty) -> u128 {
        calc_rate_from_qty(
            dst_qty,
            src_qty,
            self.decimals(direction.dst_fund()),
            self.decimals(direction.src_fund()),
        )
    }

    // ========================================================================
    // Maker Funds
    // ========================================================================

    /// Deposit funds for a maker, opening the account on first deposit.
    pub fn deposit(&mut self, maker: MakerId, fund: FundKind, amount: Qty) -> Result<Qty> {
        if amount == 0 {
            debug!(maker, ?fund, "Rejected zero deposit");
            return Err(ReserveError::InvalidQuantity("deposit amount is zero"));
        }
        let balance = self.ledger.deposit(maker, fund, amount)?;
        info!(maker, ?fund, amount, balance, "Deposit");
        Ok(balance)
    }

    /// Deposit ETH
    pub fn deposit_ether(&mut self, maker: MakerId, amount: Qty) -> Result<Qty> {
        self.deposit(maker, FundKind::Ether, amount)
    }

    /// Deposit tokens
    pub fn deposit_token(&mut self, maker: MakerId, amount: Qty) -> Result<Qty> {
        self.deposit(maker, FundKind::Token, amount)
    }

    /// Deposit stake tokens
    pub fn deposit_stake(&mut self, maker: MakerId, amount: Qty) -> Result<Qty> {
        self.deposit(maker, FundKind::Stake, amount)
    }

    /// Withdraw free funds.
    ///
    /// ETH and token withdrawals need a sufficient free balance. Stake
    /// withdrawals are limited to the unlocked stake.
    pub fn withdraw(&mut self, maker: MakerId, fund: FundKind, amount: Qty) -> Result<()> {
        let funds = self
            .ledger
            .funds(maker)
            .ok_or(ReserveError::UnknownMaker(maker))?;

        if fund == FundKind::Stake {
            let unlocked = self.stake.unlocked_stake(funds);
            if amount > unlocked {
                debug!(maker, amount, unlocked, "Rejected stake withdrawal");
                return Err(ReserveError::InsufficientStake {
                    available: unlocked,
                    required: amount,
                });
            }
        }

        if let Err(err) = self.ledger.debit(maker, fund, amount) {
            debug!(maker, ?fund, amount, %err, "Rejected withdrawal");
            return Err(err);
        }
        info!(maker, ?fund, amount, "Withdraw");
        Ok(())
    }

    // ========================================================================
    // Administration
    // ========================================================================

    /// Enable or disable taker trades
    pub fn set_trade_enabled(&mut self, enabled: bool) {
        info!(enabled, "Trade enabled changed");
        self.trade_enabled = enabled;
    }

    /// Set the reference stake-token rate used for collateral
    pub fn set_knc_per_eth_base_rate(&mut self, rate: u128) -> Result<()> {
        Self::check_knc_rate(rate)?;
        info!(rate, "Base stake rate changed");
        self.stake.base_rate = rate;
        Ok(())
    }

    /// Set the live stake-token rate used for burns
    pub fn set_current_knc_rate(&mut self, rate: u128) -> Result<()> {
        Self::check_knc_rate(rate)?;
        info!(rate, "Current stake rate changed");
        self.stake.current_rate = rate;
        Ok(())
    }

    fn check_knc_rate(rate: u128) -> Result<()> {
        if rate == 0 || rate > MAX_RATE {
            debug!(rate, "Rejected stake rate");
            return Err(ReserveError::InvalidRate { rate });
        }
        Ok(())
    }

    /// Set the burn fee in basis points
    pub fn set_burn_fee_bps(&mut self, bps: u32) -> Result<()> {
        if bps > MAX_BURN_FEE_BPS {
            debug!(bps, "Rejected burn fee");
            return Err(ReserveError::InvalidQuantity("burn fee exceeds maximum"));
        }
        info!(bps, "Burn fee changed");
        self.stake.burn_fee_bps = bps;
        Ok(())
    }

    /// Recompute order size limits from a fresh ETH/USD price
    pub fn set_order_limits(&mut self, dollars_per_eth: u128) -> Result<()> {
        let usd = self.limits.min_new_order_size_usd;
        let limits = OrderLimits::from_dollar_price(usd, dollars_per_eth, self.limits.max_orders_per_trade)
            .map_err(|err| {
                debug!(dollars_per_eth, %err, "Rejected order limits");
                ReserveError::InvalidQuantity("order limits derive to zero")
            })?;
        info!(min_new_order_wei = limits.min_new_order_wei, "Order limits changed");
        self.limits = limits;
        Ok(())
    }

    /// Set the minimum new order size in whole dollars together with the
    /// ETH price, deriving the wei limits
    pub fn set_min_new_order_usd(&mut self, usd: u128, dollars_per_eth: u128) -> Result<()> {
        let previous = self.limits;
        self.limits.min_new_order_size_usd = usd;
        if let Err(err) = self.set_order_limits(dollars_per_eth) {
            self.limits = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Set the wei limits directly
    pub fn set_min_new_order_wei(&mut self, wei: Qty) -> Result<()> {
        if wei == 0 {
            return Err(ReserveError::InvalidQuantity("minimum order is zero"));
        }
        info!(min_new_order_wei = wei, "Order limits changed");
        self.limits = OrderLimits::new(wei, self.limits.max_orders_per_trade);
        Ok(())
    }

    /// Set how many maker orders a single trade may consume
    pub fn set_max_orders_per_trade(&mut self, max: u32) -> Result<()> {
        if max == 0 {
            return Err(ReserveError::InvalidQuantity("max orders per trade is zero"));
        }
        info!(max, "Max orders per trade changed");
        self.limits.max_orders_per_trade = max;
        Ok(())
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// A maker's funds, if the maker has deposited
    pub fn maker_funds(&self, maker: MakerId) -> Option<&MakerFunds> {
        self.ledger.funds(maker)
    }

    /// Stake currently locked by a maker's open orders
    pub fn maker_staked_knc(&self, maker: MakerId) -> Qty {
        self.ledger
            .funds(maker)
            .map_or(0, |funds| self.stake.staked(funds))
    }

    /// Stake a maker can withdraw or commit to new orders
    pub fn maker_unlocked_knc(&self, maker: MakerId) -> Qty {
        self.ledger
            .funds(maker)
            .map_or(0, |funds| self.stake.unlocked_stake(funds))
    }

    /// ETH notional of all of a maker's open orders
    pub fn maker_total_orders_wei(&self, maker: MakerId) -> Qty {
        self.ledger
            .funds(maker)
            .map_or(0, |funds| funds.total_notional_locked)
    }

    /// A maker's open order ids on one list, ascending
    pub fn maker_orders(&self, maker: MakerId, direction: Direction) -> Vec<OrderId> {
        self.ledger
            .pool(maker, direction)
            .map(|pool| pool.taken_ids())
            .unwrap_or_default()
    }

    /// An open order
    pub fn get_order(&self, direction: Direction, id: OrderId) -> Option<&Order> {
        self.list(direction).get(id)
    }

    /// Open order ids on one list, best first
    pub fn order_list(&self, direction: Direction) -> Vec<OrderId> {
        self.list(direction).ids()
    }

    /// Best order on one list, or `TAIL_ID`
    pub fn first_order_id(&self, direction: Direction) -> OrderId {
        self.list(direction).first_order_id()
    }

    /// True while the live stake rate is too far above the base rate
    pub fn knc_rate_blocks_trade(&self) -> bool {
        self.stake.rate_blocks_trade()
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 over both lists, every maker account and the counters.
    ///
    /// Two reserves with equal roots hold identical books and ledgers.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = StateHasher::new();
        for list in &self.lists {
            list.absorb_into(&mut hasher);
        }
        self.ledger.absorb_into(&mut hasher);
        hasher.absorb_bytes(&self.next_trade_id.to_le_bytes());
        hasher.finish()
    }

    /// State root as lowercase hex
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
