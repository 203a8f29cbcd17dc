//! Maker fund records.

use ssz_rs::prelude::*;

use crate::types::Qty;

/// Fund held by a maker inside the reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundKind {
    /// Native asset (wei)
    Ether,
    /// Traded token (base units)
    Token,
    /// Stake token collateralizing open orders
    Stake,
}

/// Per-maker balances.
///
/// `ether` and `token` are free balances only; amounts locked in open
/// orders live in the orders themselves. `stake` is the full stake balance,
/// of which `required_stake(total_notional_locked)` is locked.
///
/// ## SSZ Layout
///
/// Fixed-size container: 4 * 16 = 64 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct MakerFunds {
    /// Free ETH balance
    pub ether: u128,

    /// Free token balance
    pub token: u128,

    /// Stake token balance (locked and unlocked)
    pub stake: u128,

    /// Sum of the ETH legs of all open orders
    pub total_notional_locked: u128,
}

impl MakerFunds {
    /// Balance of one fund kind
    #[inline]
    pub fn balance(&self, fund: FundKind) -> Qty {
        match fund {
            FundKind::Ether => self.ether,
            FundKind::Token => self.token,
            FundKind::Stake => self.stake,
        }
    }

    /// Mutable balance of one fund kind
    #[inline]
    pub fn balance_mut(&mut self, fund: FundKind) -> &mut Qty {
        match fund {
            FundKind::Ether => &mut self.ether,
            FundKind::Token => &mut self.token,
            FundKind::Stake => &mut self.stake,
        }
    }
}
