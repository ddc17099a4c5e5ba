//! Escrow Accounting
//!
//! Tracks the native funds the registry holds in custody and splits them
//! into what is owed back to bidders, what is waiting to be paid out, and
//! the treasury surplus. Every method either applies fully or leaves the
//! ledger untouched.
//!
//! Invariant: `held >= outstanding_bids + pending_proceeds`

use lib_types::Amount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Escrow accounting errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    #[error("Escrow arithmetic overflow")]
    Overflow,

    #[error("Cannot release {requested} from bids; only {outstanding} outstanding")]
    BidUnderflow { outstanding: Amount, requested: Amount },

    #[error("Cannot release {requested} from proceeds; only {pending} pending")]
    ProceedsUnderflow { pending: Amount, requested: Amount },

    #[error("Fee {fee} exceeds sale price {price}")]
    FeeExceedsPrice { fee: Amount, price: Amount },

    #[error("Cannot withdraw {requested}; surplus is {available}")]
    SurplusExceeded { available: Amount, requested: Amount },
}

/// Custody accounting for the native asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowLedger {
    held: Amount,
    outstanding_bids: Amount,
    pending_proceeds: Amount,
}

impl EscrowLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total native funds in custody
    pub fn held(&self) -> Amount {
        self.held
    }

    /// Sum of all live bids
    pub fn outstanding_bids(&self) -> Amount {
        self.outstanding_bids
    }

    /// Seller proceeds and credited refunds awaiting payout
    pub fn pending_proceeds(&self) -> Amount {
        self.pending_proceeds
    }

    /// Funds owed to third parties
    pub fn owed(&self) -> Amount {
        self.outstanding_bids.saturating_add(self.pending_proceeds)
    }

    /// Funds that belong to the treasury
    pub fn surplus(&self) -> Amount {
        self.held.saturating_sub(self.owed())
    }

    pub fn check_invariant(&self) -> bool {
        self.outstanding_bids
            .checked_add(self.pending_proceeds)
            .map_or(false, |owed| self.held >= owed)
    }

    /// Record a new bid arriving in custody
    pub fn deposit_bid(&mut self, amount: Amount) -> Result<(), EscrowError> {
        let held = self.held.checked_add(amount).ok_or(EscrowError::Overflow)?;
        let bids = self
            .outstanding_bids
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;
        self.held = held;
        self.outstanding_bids = bids;
        Ok(())
    }

    /// Record a bid leaving custody back to its bidder
    pub fn refund_bid(&mut self, amount: Amount) -> Result<(), EscrowError> {
        let bids = self.take_from_bids(amount)?;
        self.outstanding_bids = bids;
        self.held -= amount;
        Ok(())
    }

    /// Move an accepted bid into seller proceeds, leaving `fee` as surplus.
    ///
    /// Funds stay in custody. Returns the seller's share.
    pub fn settle_bid(&mut self, price: Amount, fee: Amount) -> Result<Amount, EscrowError> {
        if fee > price {
            return Err(EscrowError::FeeExceedsPrice { fee, price });
        }
        let share = price - fee;
        let bids = self.take_from_bids(price)?;
        let proceeds = self
            .pending_proceeds
            .checked_add(share)
            .ok_or(EscrowError::Overflow)?;
        self.outstanding_bids = bids;
        self.pending_proceeds = proceeds;
        Ok(share)
    }

    /// Record funds that arrived in custody but could not be handed back.
    /// They are owed to their sender until claimed.
    pub fn credit_payout(&mut self, amount: Amount) -> Result<(), EscrowError> {
        let held = self.held.checked_add(amount).ok_or(EscrowError::Overflow)?;
        let proceeds = self
            .pending_proceeds
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;
        self.held = held;
        self.pending_proceeds = proceeds;
        Ok(())
    }

    /// Record proceeds paid out to a seller
    pub fn release_proceeds(&mut self, amount: Amount) -> Result<(), EscrowError> {
        if amount > self.pending_proceeds {
            return Err(EscrowError::ProceedsUnderflow {
                pending: self.pending_proceeds,
                requested: amount,
            });
        }
        self.pending_proceeds -= amount;
        self.held -= amount;
        Ok(())
    }

    /// Record a treasury withdrawal
    pub fn withdraw_surplus(&mut self, amount: Amount) -> Result<(), EscrowError> {
        let available = self.surplus();
        if amount > available {
            return Err(EscrowError::SurplusExceeded {
                available,
                requested: amount,
            });
        }
        self.held -= amount;
        Ok(())
    }

    fn take_from_bids(&self, amount: Amount) -> Result<Amount, EscrowError> {
        self.outstanding_bids
            .checked_sub(amount)
            .ok_or(EscrowError::BidUnderflow {
                outstanding: self.outstanding_bids,
                requested: amount,
            })
    }
}
