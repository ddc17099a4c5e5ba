//! Credits
//!
//! Value that reached custody but could not be handed back to its sender
//! is booked as a credit. The sender claims it later; until then it is
//! owed and never counted as treasury surplus.

use lib_tokens::{AssetLedger, TokenLedger};
use lib_types::{Address, Amount};

use super::ReservationRegistry;
use crate::context::CallContext;
use crate::errors::{RegistryResult, ReservationError};
use crate::escrow::EscrowError;
use crate::events::RegistryEvent;

impl<N: AssetLedger, T: TokenLedger> ReservationRegistry<N, T> {
    /// Book `amount`, already sitting unaccounted in custody, as owed to `to`
    pub(crate) fn credit(&mut self, to: Address, amount: Amount) -> RegistryResult<()> {
        self.ensure_in_custody(amount)?;
        let owed = self
            .credit_of(&to)
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;

        let mut staged = self.state.escrow;
        staged.credit_payout(amount)?;
        self.state.escrow = staged;
        self.state.credits.insert(to, owed);

        tracing::warn!("Credited {} to {} after a failed return", amount, to);
        self.emit(RegistryEvent::Credited { to, amount });
        Ok(())
    }

    /// Pay the caller everything credited to them. Allowed after launch.
    pub fn claim_credit(&mut self, ctx: CallContext) -> RegistryResult<Amount> {
        let amount = self.credit_of(&ctx.caller);
        if amount == 0 {
            return Err(ReservationError::NothingToClaim(ctx.caller));
        }

        let mut staged = self.state.escrow;
        staged.release_proceeds(amount)?;
        self.native
            .transfer(&self.custody, &ctx.caller, amount)
            .map_err(|e| {
                tracing::warn!("Credit claim of {} by {} failed: {}", amount, ctx.caller, e);
                ReservationError::TransferFailed(e)
            })?;
        self.state.escrow = staged;
        self.state.credits.remove(&ctx.caller);

        tracing::info!("{} claimed {} in credits", ctx.caller, amount);
        self.emit(RegistryEvent::CreditClaimed {
            to: ctx.caller,
            amount,
        });
        Ok(amount)
    }

    /// Fail unless custody holds `amount` beyond what escrow already tracks
    pub(crate) fn ensure_in_custody(&self, amount: Amount) -> RegistryResult<()> {
        let unaccounted = self
            .native
            .balance_of(&self.custody)
            .saturating_sub(self.state.escrow.held());
        if unaccounted < amount {
            tracing::debug!(
                "Value {} not in custody; {} unaccounted",
                amount,
                unaccounted
            );
            return Err(ReservationError::ValueNotInCustody {
                value: amount,
                unaccounted,
            });
        }
        Ok(())
    }
}
