//! Per-maker fund ledger.
//!
//! ## Accounts
//!
//! A maker account is created on the maker's first deposit and is never
//! destroyed. It holds the maker's free balances ([`MakerFunds`]) and one
//! [`OrderIdPool`] per list. Pools are carved from a per-list counter that
//! starts at `FIRST_ORDER_ID` and advances by `NUM_ORDER_IDS`, so order ids
//! never collide between makers.
//!
//! ## Ordering
//!
//! Accounts live in a `BTreeMap`, so iteration (and therefore the state
//! root) is ordered by maker id.
//!
//! ## Example
//!
//! ```
//! use orderbook_reserve::ledger::MakerLedger;
//! use orderbook_reserve::types::{Direction, FundKind};
//!
//! let mut ledger = MakerLedger::new();
//! ledger.deposit(7, FundKind::Ether, 1_000).unwrap();
//!
//! assert_eq!(ledger.funds(7).unwrap().ether, 1_000);
//! assert_eq!(ledger.pool(7, Direction::EthToToken).unwrap().first_id, 3);
//! ```

use std::collections::BTreeMap;

use crate::config::{FIRST_ORDER_ID, NUM_ORDER_IDS};
use crate::error::{ReserveError, Result};
use crate::orderbook::OrderIdPool;
use crate::types::{Direction, FundKind, MakerFunds, MakerId, Qty, StateHasher};

/// Everything the reserve tracks for one maker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MakerAccount {
    /// Free balances, stake and locked notional
    pub funds: MakerFunds,

    /// Order id pools, indexed by [`Direction::index`]
    pools: [OrderIdPool; 2],
}

impl MakerAccount {
    /// Id pool for one list
    #[inline]
    pub fn pool(&self, direction: Direction) -> &OrderIdPool {
        &self.pools[direction.index()]
    }

    /// Mutable id pool for one list
    #[inline]
    pub fn pool_mut(&mut self, direction: Direction) -> &mut OrderIdPool {
        &mut self.pools[direction.index()]
    }
}

/// All maker accounts of one reserve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakerLedger {
    accounts: BTreeMap<MakerId, MakerAccount>,

    /// First id of the next pool handed out, per list
    next_pool_id: [u32; 2],
}

impl Default for MakerLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MakerLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
            next_pool_id: [FIRST_ORDER_ID; 2],
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Number of maker accounts
    #[inline]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if no maker has deposited yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Get a maker's account
    #[inline]
    pub fn account(&self, maker: MakerId) -> Option<&MakerAccount> {
        self.accounts.get(&maker)
    }

    /// Get a maker's account, or `UnknownMaker`
    pub fn account_mut(&mut self, maker: MakerId) -> Result<&mut MakerAccount> {
        self.accounts
            .get_mut(&maker)
            .ok_or(ReserveError::UnknownMaker(maker))
    }

    /// Get a maker's funds
    #[inline]
    pub fn funds(&self, maker: MakerId) -> Option<&MakerFunds> {
        self.account(maker).map(|account| &account.funds)
    }

    /// Get a maker's funds, or `UnknownMaker`
    pub fn funds_mut(&mut self, maker: MakerId) -> Result<&mut MakerFunds> {
        self.account_mut(maker).map(|account| &mut account.funds)
    }

    /// Get a maker's id pool for one list
    #[inline]
    pub fn pool(&self, maker: MakerId, direction: Direction) -> Option<&OrderIdPool> {
        self.account(maker).map(|account| account.pool(direction))
    }

    /// Iterate accounts in maker id order
    pub fn iter(&self) -> impl Iterator<Item = (&MakerId, &MakerAccount)> {
        self.accounts.iter()
    }

    /// Sum of one fund kind over all makers
    pub fn total_balance(&self, fund: FundKind) -> Qty {
        self.accounts
            .values()
            .fold(0u128, |acc, account| acc.saturating_add(account.funds.balance(fund)))
    }

    // ========================================================================
    // Funds
    // ========================================================================

    /// Credit a deposit, creating the account on first use.
    ///
    /// Returns the new balance.
    pub fn deposit(&mut self, maker: MakerId, fund: FundKind, amount: Qty) -> Result<Qty> {
        let current = self.funds(maker).map_or(0, |funds| funds.balance(fund));
        let updated = current.checked_add(amount).ok_or(ReserveError::Overflow)?;

        let account = self.open_account(maker)?;
        *account.funds.balance_mut(fund) = updated;
        Ok(updated)
    }

    /// Debit a free balance, failing without change if it is too small
    pub fn debit(&mut self, maker: MakerId, fund: FundKind, amount: Qty) -> Result<()> {
        let funds = self.funds_mut(maker)?;
        let balance = funds.balance_mut(fund);
        if *balance < amount {
            return Err(ReserveError::InsufficientBalance {
                fund,
                available: *balance,
                required: amount,
            });
        }
        *balance -= amount;
        Ok(())
    }

    fn open_account(&mut self, maker: MakerId) -> Result<&mut MakerAccount> {
        if !self.accounts.contains_key(&maker) {
            let mut pools = [OrderIdPool::default(), OrderIdPool::default()];
            let mut next = self.next_pool_id;
            for direction in Direction::ALL {
                let i = direction.index();
                pools[i] = OrderIdPool::new(next[i]);
                next[i] = next[i].checked_add(NUM_ORDER_IDS).ok_or(ReserveError::Overflow)?;
            }
            self.next_pool_id = next;
            self.accounts.insert(
                maker,
                MakerAccount {
                    funds: MakerFunds::default(),
                    pools,
                },
            );
        }
        self.account_mut(maker)
    }

    /// Feed every account and the pool counters into a state hasher
    pub fn absorb_into(&self, hasher: &mut StateHasher) {
        for id in self.next_pool_id {
            hasher.absorb_bytes(&id.to_le_bytes());
        }
        hasher.absorb_bytes(&(self.accounts.len() as u64).to_le_bytes());
        for (maker, account) in &self.accounts {
            hasher.absorb_bytes(&maker.to_le_bytes());
            hasher.absorb(&account.funds);
            for pool in &account.pools {
                hasher.absorb(pool);
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
