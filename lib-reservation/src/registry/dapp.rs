//! Dapp approval workflow

use lib_tokens::{AssetLedger, TokenLedger};
use lib_types::ReservationId;

use super::ReservationRegistry;
use crate::context::CallContext;
use crate::errors::{RegistryResult, ReservationError};
use crate::events::RegistryEvent;
use crate::types::{ApprovalState, ReservationKind};

impl<N: AssetLedger, T: TokenLedger> ReservationRegistry<N, T> {
    /// Approve or deny a pending dapp reservation.
    ///
    /// Approval makes the reservation active. Denial deletes it and frees
    /// its name and key. Only the signatory may decide, and only once.
    pub fn dapp_decision(
        &mut self,
        ctx: CallContext,
        id: ReservationId,
        approve: bool,
    ) -> RegistryResult<ApprovalState> {
        self.state.access.ensure_not_launched()?;
        self.state
            .access
            .ensure_signatory(&ctx.caller, "decide dapp reservations")?;

        let reservation = self
            .state
            .reservations
            .get_mut(&id)
            .ok_or(ReservationError::NotFound(id))?;

        match reservation.kind {
            ReservationKind::Dapp(ApprovalState::Pending) => {}
            ReservationKind::Dapp(_) => return Err(ReservationError::AlreadyDecided(id)),
            ReservationKind::User => return Err(ReservationError::NotFound(id)),
        }

        if approve {
            reservation.kind = ReservationKind::Dapp(ApprovalState::Approved);
            tracing::info!("Dapp reservation {} ('{}') approved", id, reservation.name);
            self.emit(RegistryEvent::DappApproved { id });
            return Ok(ApprovalState::Approved);
        }

        let removed = self.state.reservations.remove(&id).ok_or(ReservationError::NotFound(id))?;
        self.state.names.remove(&removed.name);
        self.state.keys.remove(&removed.key);

        tracing::info!("Dapp reservation {} ('{}') denied", id, removed.name);
        self.emit(RegistryEvent::DappDenied {
            id,
            name: removed.name,
        });
        Ok(ApprovalState::Denied)
    }
}
