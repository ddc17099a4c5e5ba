//! Asset Ledger Collaborators
//!
//! The reservation ledger never owns balances itself. It consumes two
//! external ledgers through these traits:
//!
//! - [`AssetLedger`]: the native currency (payouts, refunds, balance queries)
//! - [`TokenLedger`]: a separate fungible token with ERC-20 style allowances
//!
//! Every transfer is fallible and must be treated as such by callers.

use lib_types::{Address, Amount};

use crate::errors::TokenResult;

/// Minimal interface of a fungible balance ledger
pub trait AssetLedger: Send + Sync {
    /// Balance held by `account` (zero for unknown accounts)
    fn balance_of(&self, account: &Address) -> Amount;

    /// Move `amount` from `from` to `to`.
    ///
    /// On error no balance has changed.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> TokenResult<()>;
}

/// Token ledger with third-party spending allowances
pub trait TokenLedger: AssetLedger {
    /// Allow `spender` to move up to `amount` out of `owner`
    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) -> TokenResult<()>;

    /// Remaining allowance granted by `owner` to `spender`
    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Move `amount` from `owner` to `to` on behalf of `spender`, consuming allowance
    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> TokenResult<()>;
}
