//! Signatory assignment and launch

use lib_tokens::{AssetLedger, TokenLedger};
use lib_types::Address;

use super::ReservationRegistry;
use crate::context::CallContext;
use crate::errors::RegistryResult;
use crate::events::RegistryEvent;

impl<N: AssetLedger, T: TokenLedger> ReservationRegistry<N, T> {
    /// Assign the signatory. The owner sets the first one; after that only
    /// the sitting signatory can replace itself.
    pub fn set_signatory(&mut self, ctx: CallContext, signatory: Address) -> RegistryResult<()> {
        let previous = self.state.access.set_signatory(&ctx.caller, signatory)?;

        tracing::info!("Signatory set to {}", signatory);
        self.emit(RegistryEvent::SignatorySet {
            previous,
            signatory,
        });
        Ok(())
    }

    /// Launch the system. Owner only, and irreversible: `false` is
    /// accepted as a no-op beforehand, and every call fails afterwards.
    pub fn set_chain_launched(&mut self, ctx: CallContext, launched: bool) -> RegistryResult<()> {
        if self.state.access.set_launched(&ctx.caller, launched)? {
            tracing::info!(
                "System launched with {} reservations; book is frozen",
                self.state.reservations.len()
            );
            self.emit(RegistryEvent::ChainLaunched);
        }
        Ok(())
    }
}
