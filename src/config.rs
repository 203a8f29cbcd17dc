//! Reserve-wide constants and construction parameters.
//!
//! ## Fixed-Point Conventions
//!
//! Quantities are raw token units (`u128`). Rates are scaled by
//! [`PRECISION`] (10^18), so a rate of `2 * PRECISION` means "2 destination
//! units per source unit" after decimal normalization.
//!
//! ## Example
//!
//! ```
//! use orderbook_reserve::config::ReserveConfig;
//!
//! let config = ReserveConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.burn_fee_bps, 25);
//! ```

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{OrderId, Qty};

/// Fixed-point scale for rates: 10^18
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Basis points denominator
pub const BPS: u128 = 10_000;

/// Largest accepted order or trade quantity: 10^28
pub const MAX_QTY: Qty = 10_000_000_000_000_000_000_000_000_000;

/// Largest accepted rate: 10^24 (10^6 in PRECISION units)
pub const MAX_RATE: u128 = 1_000_000_000_000_000_000_000_000;

/// Decimals of the native asset
pub const ETH_DECIMALS: u32 = 18;

/// Largest supported token decimals
pub const MAX_DECIMALS: u32 = 18;

/// Upper bound for the maker burn fee
pub const MAX_BURN_FEE_BPS: u32 = 100;

/// Order ids reserved per maker per list
pub const NUM_ORDER_IDS: u32 = 32;

/// Logical end of every order list. Never stored.
pub const TAIL_ID: OrderId = 1;

/// Head sentinel of every order list. `HEAD.next` is the best order.
pub const HEAD_ID: OrderId = 2;

/// First id handed out to maker pools
pub const FIRST_ORDER_ID: OrderId = 3;

/// Default collateral multiplier over the expected burn
pub const DEFAULT_BURN_TO_STAKE_FACTOR: u128 = 5;

/// Default limit of maker orders consumed by a single taker trade
pub const DEFAULT_MAX_ORDERS_PER_TRADE: u32 = 5;

/// Construction parameters for an [`OrderbookReserve`](crate::OrderbookReserve).
///
/// Every field has a default matching the reference deployment, so a host
/// can deserialize a partial document and override only what it needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReserveConfig {
    /// Decimals of the traded token (ETH is always 18)
    pub token_decimals: u32,

    /// Minimum ETH leg of a new or updated order, in wei
    pub min_new_order_wei: Qty,

    /// Maximum maker orders a single taker trade may consume
    pub max_orders_per_trade: u32,

    /// Fee burned from maker stake on fill, in basis points of the ETH leg
    pub burn_fee_bps: u32,

    /// Multiplier applied to the burn amount to size required stake
    pub burn_to_stake_factor: u128,

    /// Reference stake-token per ETH rate (scaled by PRECISION)
    pub knc_per_eth_rate: u128,
}

impl Default for ReserveConfig {
    fn default() -> Self {
        Self {
            token_decimals: 18,
            min_new_order_wei: 2 * PRECISION,
            max_orders_per_trade: DEFAULT_MAX_ORDERS_PER_TRADE,
            burn_fee_bps: 25,
            burn_to_stake_factor: DEFAULT_BURN_TO_STAKE_FACTOR,
            knc_per_eth_rate: 280 * PRECISION,
        }
    }
}

impl ReserveConfig {
    /// Check every parameter is inside its supported range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_decimals > MAX_DECIMALS {
            return Err(ConfigError::InvalidValue {
                field: "token_decimals",
                reason: format!("{} exceeds {}", self.token_decimals, MAX_DECIMALS),
            });
        }
        if self.min_new_order_wei == 0 {
            return Err(ConfigError::Zero { field: "min_new_order_wei" });
        }
        if self.min_new_order_wei > MAX_QTY {
            return Err(ConfigError::InvalidValue {
                field: "min_new_order_wei",
                reason: "exceeds MAX_QTY".to_string(),
            });
        }
        if self.max_orders_per_trade == 0 {
            return Err(ConfigError::Zero { field: "max_orders_per_trade" });
        }
        if self.burn_fee_bps > MAX_BURN_FEE_BPS {
            return Err(ConfigError::InvalidValue {
                field: "burn_fee_bps",
                reason: format!("{} exceeds {}", self.burn_fee_bps, MAX_BURN_FEE_BPS),
            });
        }
        if self.burn_to_stake_factor == 0 {
            return Err(ConfigError::Zero { field: "burn_to_stake_factor" });
        }
        if self.knc_per_eth_rate == 0 {
            return Err(ConfigError::Zero { field: "knc_per_eth_rate" });
        }
        if self.knc_per_eth_rate > MAX_RATE {
            return Err(ConfigError::InvalidValue {
                field: "knc_per_eth_rate",
                reason: "exceeds MAX_RATE".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_distinct() {
        assert_ne!(HEAD_ID, TAIL_ID);
        assert!(FIRST_ORDER_ID > HEAD_ID);
        assert!(FIRST_ORDER_ID > TAIL_ID);
    }

    #[test]
    fn test_default_is_valid() {
        let config = ReserveConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_new_order_wei, 2_000_000_000_000_000_000);
        assert_eq!(config.max_orders_per_trade, 5);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = ReserveConfig { token_decimals: 19, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "token_decimals", .. })
        ));

        let config = ReserveConfig { burn_fee_bps: 101, ..Default::default() };
        assert!(config.validate().is_err());

        let config = ReserveConfig { max_orders_per_trade: 0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Zero { field: "max_orders_per_trade" })
        ));

        let config = ReserveConfig { knc_per_eth_rate: MAX_RATE + 1, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ReserveConfig =
            serde_json::from_str(r#"{ "token_decimals": 6, "burn_fee_bps": 40 }"#).unwrap();

        assert_eq!(config.token_decimals, 6);
        assert_eq!(config.burn_fee_bps, 40);
        assert_eq!(config.burn_to_stake_factor, DEFAULT_BURN_TO_STAKE_FACTOR);
        assert!(config.validate().is_ok());
    }
}
