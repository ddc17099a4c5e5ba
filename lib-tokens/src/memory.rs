//! In-memory ledger for tests and local simulation.
//!
//! Implements both [`AssetLedger`] and [`TokenLedger`]. Recipients can be
//! marked as rejecting so that payouts to them fail, which is how callers
//! exercise their rollback paths.

use std::collections::{HashMap, HashSet};

use lib_types::{Address, Amount};

use crate::errors::{TokenError, TokenResult};
use crate::ledger::{AssetLedger, TokenLedger};

/// Balance ledger backed by hash maps
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    rejecting: HashSet<Address>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` out of thin air
    pub fn mint(&mut self, account: &Address, amount: Amount) {
        let balance = self.balances.entry(*account).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Make every incoming transfer to `account` fail (or stop failing)
    pub fn set_rejecting(&mut self, account: &Address, rejecting: bool) {
        if rejecting {
            self.rejecting.insert(*account);
        } else {
            self.rejecting.remove(account);
        }
    }

    /// Sum of all balances
    pub fn total_supply(&self) -> Amount {
        self.balances.values().sum()
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> TokenResult<()> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        if self.rejecting.contains(to) {
            tracing::debug!("In-memory ledger: {} rejected incoming {}", to, amount);
            return Err(TokenError::RecipientRejected(*to));
        }

        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }
        if from == to {
            return Ok(());
        }

        let to_balance = self.balance_of(to);
        let new_to_balance = to_balance.checked_add(amount).ok_or(TokenError::Overflow)?;

        self.balances.insert(*from, from_balance - amount);
        self.balances.insert(*to, new_to_balance);
        Ok(())
    }
}

impl TokenLedger for InMemoryLedger {
    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) -> TokenResult<()> {
        self.allowances.insert((*owner, *spender), amount);
        Ok(())
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> TokenResult<()> {
        let allowance = self.allowance(owner, spender);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                have: allowance,
                need: amount,
            });
        }

        self.transfer(owner, to, amount)?;
        self.allowances.insert((*owner, *spender), allowance - amount);
        Ok(())
    }
}
