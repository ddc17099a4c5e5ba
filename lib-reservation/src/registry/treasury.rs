//! Treasury
//!
//! The treasury may only take what nobody else is owed: the native
//! escrow surplus and the custody account's token balance.

use lib_tokens::{AssetLedger, TokenLedger};
use lib_types::{Address, Amount};

use super::ReservationRegistry;
use crate::context::CallContext;
use crate::errors::{RegistryResult, ReservationError};
use crate::events::RegistryEvent;
use crate::types::Transferrable;

impl<N: AssetLedger, T: TokenLedger> ReservationRegistry<N, T> {
    /// Amounts available for withdrawal. Owner or signatory only.
    pub fn get_transferrable(&self, ctx: CallContext) -> RegistryResult<Transferrable> {
        self.state
            .access
            .ensure_owner_or_signatory(&ctx.caller, "view transferrable funds")?;
        Ok(self.transferrable())
    }

    pub(crate) fn transferrable(&self) -> Transferrable {
        Transferrable {
            native: self.state.escrow.surplus(),
            token: self.token.balance_of(&self.custody),
        }
    }

    /// Send `amount` of native surplus to `to`. Signatory only.
    #[doc(alias = "transferEthOut")]
    pub fn transfer_native_out(
        &mut self,
        ctx: CallContext,
        to: Address,
        amount: Amount,
    ) -> RegistryResult<()> {
        self.state
            .access
            .ensure_signatory(&ctx.caller, "withdraw native funds")?;
        if to.is_zero() {
            return Err(ReservationError::ZeroAddress);
        }

        let available = self.state.escrow.surplus();
        if amount > available {
            return Err(ReservationError::InsufficientTransferrable {
                requested: amount,
                available,
            });
        }

        let mut staged = self.state.escrow;
        staged.withdraw_surplus(amount)?;
        self.native.transfer(&self.custody, &to, amount).map_err(|e| {
            tracing::warn!("Native withdrawal of {} to {} failed: {}", amount, to, e);
            ReservationError::TransferFailed(e)
        })?;
        self.state.escrow = staged;

        tracing::info!("Transferred {} native out to {}", amount, to);
        self.emit(RegistryEvent::NativeTransferredOut { to, amount });
        Ok(())
    }

    /// Send `amount` of the custody token balance to `to`. Signatory only.
    pub fn transfer_token_out(
        &mut self,
        ctx: CallContext,
        to: Address,
        amount: Amount,
    ) -> RegistryResult<()> {
        self.state
            .access
            .ensure_signatory(&ctx.caller, "withdraw tokens")?;
        if to.is_zero() {
            return Err(ReservationError::ZeroAddress);
        }

        let available = self.token.balance_of(&self.custody);
        if amount > available {
            return Err(ReservationError::InsufficientTransferrable {
                requested: amount,
                available,
            });
        }

        self.token.transfer(&self.custody, &to, amount).map_err(|e| {
            tracing::warn!("Token withdrawal of {} to {} failed: {}", amount, to, e);
            ReservationError::TransferFailed(e)
        })?;

        tracing::info!("Transferred {} tokens out to {}", amount, to);
        self.emit(RegistryEvent::TokenTransferredOut { to, amount });
        Ok(())
    }
}
