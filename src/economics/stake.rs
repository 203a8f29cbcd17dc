//! Stake collateral and burn arithmetic.
//!
//! ## Model
//!
//! Every fill burns `burn_fee_bps` of its ETH leg, converted to stake tokens
//! at the current stake-token/ETH rate. To make sure a maker can always pay,
//! open orders lock `burn_to_stake_factor` times the burn they would cause
//! at the reference (base) rate.
//!
//! ```text
//! burn     = floor(wei * bps * rate / (BPS * PRECISION))
//! required = burn(wei, base_rate) * factor
//! unlocked = stake - required(total_notional_locked)   (saturating)
//! burned   = min(burn(filled_wei, current_rate), unlocked after the fill)
//! ```

use alloy_primitives::U256;

use crate::config::{ReserveConfig, BPS, PRECISION};
use crate::economics::rate::narrow;
use crate::types::{MakerFunds, Qty};

/// Stake tokens burned for a fill with the given ETH leg.
///
/// # Example
///
/// ```
/// use orderbook_reserve::economics::burn_amount;
///
/// // 2 ETH at 25 bps and 280 stake tokens per ETH burns 1.4 stake tokens
/// let burn = burn_amount(2_000_000_000_000_000_000, 25, 280_000_000_000_000_000_000);
/// assert_eq!(burn, 1_400_000_000_000_000_000);
/// ```
pub fn burn_amount(wei: Qty, burn_fee_bps: u32, knc_per_eth_rate: u128) -> Qty {
    let numerator = U256::from(wei) * U256::from(burn_fee_bps) * U256::from(knc_per_eth_rate);
    let denominator = U256::from(BPS) * U256::from(PRECISION);
    narrow(numerator / denominator)
}

/// Stake that must stay locked while `wei` of notional is open.
pub fn required_stake(
    wei: Qty,
    burn_fee_bps: u32,
    knc_per_eth_rate: u128,
    burn_to_stake_factor: u128,
) -> Qty {
    burn_amount(wei, burn_fee_bps, knc_per_eth_rate).saturating_mul(burn_to_stake_factor)
}

// ============================================================================
// StakeModel
// ============================================================================

/// The current stake parameters of one reserve.
///
/// Holds both stake-token rates: `base_rate` sizes the collateral,
/// `current_rate` prices the burn on fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeModel {
    /// Fee burned on fill, in basis points of the ETH leg
    pub burn_fee_bps: u32,

    /// Collateral multiplier over the expected burn
    pub burn_to_stake_factor: u128,

    /// Reference stake-token per ETH rate
    pub base_rate: u128,

    /// Live stake-token per ETH rate
    pub current_rate: u128,
}

impl StakeModel {
    /// Build from validated configuration. Both rates start equal.
    pub fn from_config(config: &ReserveConfig) -> Self {
        Self {
            burn_fee_bps: config.burn_fee_bps,
            burn_to_stake_factor: config.burn_to_stake_factor,
            base_rate: config.knc_per_eth_rate,
            current_rate: config.knc_per_eth_rate,
        }
    }

    /// Stake locked by `wei` of open notional
    #[inline]
    pub fn required_stake(&self, wei: Qty) -> Qty {
        required_stake(wei, self.burn_fee_bps, self.base_rate, self.burn_to_stake_factor)
    }

    /// Stake burned when `wei` of notional is filled, before capping
    #[inline]
    pub fn burn_on_fill(&self, wei: Qty) -> Qty {
        burn_amount(wei, self.burn_fee_bps, self.current_rate)
    }

    /// Stake actually burned for a fill of `wei`.
    ///
    /// `funds` must already reflect the notional the fill released. The
    /// burn never takes stake still locked by the remaining open orders.
    pub fn capped_burn(&self, funds: &MakerFunds, wei: Qty) -> Qty {
        self.burn_on_fill(wei).min(self.unlocked_stake(funds))
    }

    /// Stake currently locked by a maker's open orders
    #[inline]
    pub fn staked(&self, funds: &MakerFunds) -> Qty {
        self.required_stake(funds.total_notional_locked)
    }

    /// Stake a maker may withdraw or commit to new orders
    #[inline]
    pub fn unlocked_stake(&self, funds: &MakerFunds) -> Qty {
        funds.stake.saturating_sub(self.staked(funds))
    }

    /// True once the live rate moved so far that locked collateral may no
    /// longer cover burns.
    pub fn rate_blocks_trade(&self) -> bool {
        U256::from(self.current_rate)
            > U256::from(self.base_rate) * U256::from(self.burn_to_stake_factor)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
