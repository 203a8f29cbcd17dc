//! Order size limits.
//!
//! New orders must lock at least `min_new_order_wei` of ETH notional. Orders
//! already on the book may shrink through partial fills down to
//! `min_order_wei`, half the new-order minimum; below that they are removed.

use alloy_primitives::U256;

use crate::config::PRECISION;
use crate::economics::rate::narrow;
use crate::error::ConfigError;
use crate::types::Qty;

/// Size limits applied by order lifecycle and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLimits {
    /// Minimum new order size in whole dollars (0 when set directly in wei)
    pub min_new_order_size_usd: u128,

    /// Maximum maker orders a single taker trade may consume
    pub max_orders_per_trade: u32,

    /// Minimum ETH leg of a new or updated order
    pub min_new_order_wei: Qty,

    /// Minimum ETH leg an order may keep after a partial fill
    pub min_order_wei: Qty,
}

impl OrderLimits {
    /// Limits from a wei minimum
    pub fn new(min_new_order_wei: Qty, max_orders_per_trade: u32) -> Self {
        Self {
            min_new_order_size_usd: 0,
            max_orders_per_trade,
            min_new_order_wei,
            min_order_wei: min_new_order_wei / 2,
        }
    }

    /// Derive the wei limits from a dollar minimum and an ETH price.
    ///
    /// # Arguments
    ///
    /// * `min_new_order_size_usd` - Minimum order size in whole dollars
    /// * `dollars_per_eth` - ETH price in dollars, scaled by PRECISION
    /// * `max_orders_per_trade` - Maker orders a trade may consume
    ///
    /// # Example
    ///
    /// ```
    /// use orderbook_reserve::economics::limits::OrderLimits;
    ///
    /// // 1000 USD at 500 USD/ETH
    /// let limits = OrderLimits::from_dollar_price(
    ///     1_000,
    ///     500_000_000_000_000_000_000,
    ///     5,
    /// ).unwrap();
    /// assert_eq!(limits.min_new_order_wei, 2_000_000_000_000_000_000);
    /// assert_eq!(limits.min_order_wei, 1_000_000_000_000_000_000);
    /// ```
    pub fn from_dollar_price(
        min_new_order_size_usd: u128,
        dollars_per_eth: u128,
        max_orders_per_trade: u32,
    ) -> Result<Self, ConfigError> {
        if dollars_per_eth == 0 {
            return Err(ConfigError::Zero { field: "dollars_per_eth" });
        }

        let wei = U256::from(min_new_order_size_usd) * U256::from(PRECISION) * U256::from(PRECISION)
            / U256::from(dollars_per_eth);
        let min_new_order_wei = narrow(wei);
        if min_new_order_wei == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_new_order_size_usd",
                reason: "rounds to zero wei".to_string(),
            });
        }

        Ok(Self {
            min_new_order_size_usd,
            ..Self::new(min_new_order_wei, max_orders_per_trade)
        })
    }
}
