//! User, dapp and system reservations

use std::collections::BTreeSet;

use lib_tokens::{AssetLedger, TokenLedger};
use lib_types::ReservationId;

use super::ReservationRegistry;
use crate::context::CallContext;
use crate::errors::{RegistryResult, ReservationError};
use crate::events::RegistryEvent;
use crate::key::RegistrationKey;
use crate::name::Name;
use crate::types::{ApprovalState, ForcedName, Reservation, ReservationKind};

impl<N: AssetLedger, T: TokenLedger> ReservationRegistry<N, T> {
    /// Claim `name` for the caller, bound to `key`. Returns the new id.
    pub fn reserve_user(
        &mut self,
        ctx: CallContext,
        name: impl AsRef<[u8]>,
        key: &str,
    ) -> RegistryResult<ReservationId> {
        let (name, key) = self.check_new_reservation(name.as_ref(), key)?;
        let id = self.insert_reservation(&ctx, name.clone(), key.clone(), ReservationKind::User);

        tracing::info!("Reserved '{}' as {} for {}", name, id, ctx.caller);
        self.emit(RegistryEvent::Reserved {
            id,
            name,
            owner: ctx.caller,
            key,
        });
        Ok(id)
    }

    /// Request `name` for a dapp. The record holds its name and key but
    /// stays inactive until the signatory approves it.
    pub fn reserve_dapp(
        &mut self,
        ctx: CallContext,
        name: impl AsRef<[u8]>,
        key: &str,
    ) -> RegistryResult<ReservationId> {
        let (name, key) = self.check_new_reservation(name.as_ref(), key)?;
        let id = self.insert_reservation(
            &ctx,
            name.clone(),
            key.clone(),
            ReservationKind::Dapp(ApprovalState::Pending),
        );

        tracing::info!("Dapp reservation '{}' requested as {} by {}", name, id, ctx.caller);
        self.emit(RegistryEvent::DappRequested {
            id,
            name,
            owner: ctx.caller,
            key,
        });
        Ok(id)
    }

    /// Hold back a single name for the system
    pub fn force_reserved_name(
        &mut self,
        ctx: CallContext,
        name: impl AsRef<[u8]>,
    ) -> RegistryResult<()> {
        self.force_reserved_names(ctx, &[name]).map(|_| ())
    }

    /// Hold back a batch of names for the system. Either every name is
    /// reserved or none is. Returns the number reserved. The minimum name
    /// length does not apply here.
    pub fn force_reserved_names<S: AsRef<[u8]>>(
        &mut self,
        ctx: CallContext,
        names: &[S],
    ) -> RegistryResult<usize> {
        self.state.access.ensure_not_launched()?;
        self.state
            .access
            .ensure_signatory(&ctx.caller, "force-reserve names")?;

        let mut staged: BTreeSet<Name> = BTreeSet::new();
        for raw in names {
            let name = self.name_rules.validate_system(raw.as_ref())?;
            self.ensure_name_free(&name)?;
            if staged.contains(&name) {
                return Err(ReservationError::NameTaken {
                    name: name.to_string(),
                });
            }
            staged.insert(name);
        }

        for name in &staged {
            self.state.forced.insert(
                name.clone(),
                ForcedName {
                    name: name.clone(),
                    reserved_by: ctx.caller,
                    reserved_at: ctx.now,
                },
            );
        }

        let count = staged.len();
        tracing::info!("Force-reserved {} names", count);
        self.emit(RegistryEvent::NamesForceReserved {
            names: staged.into_iter().collect(),
        });
        Ok(count)
    }

    /// Validation shared by user and dapp reservations. Order matters:
    /// launch, name, key, name collision, key collision.
    fn check_new_reservation(
        &self,
        raw_name: &[u8],
        raw_key: &str,
    ) -> RegistryResult<(Name, RegistrationKey)> {
        self.state.access.ensure_not_launched()?;

        let name = self.name_rules.validate(raw_name).map_err(|e| {
            tracing::debug!("Rejected name: {}", e);
            e
        })?;
        let key = self.key_rules.validate(raw_key).map_err(|e| {
            tracing::debug!("Rejected key: {}", e);
            e
        })?;

        self.ensure_name_free(&name)?;
        if self.state.keys.contains_key(&key) {
            return Err(ReservationError::KeyTaken {
                key: key.to_string(),
            });
        }
        Ok((name, key))
    }

    fn insert_reservation(
        &mut self,
        ctx: &CallContext,
        name: Name,
        key: RegistrationKey,
        kind: ReservationKind,
    ) -> ReservationId {
        self.state.last_id += 1;
        let id = self.state.last_id;

        self.state.names.insert(name.clone(), id);
        self.state.keys.insert(key.clone(), id);
        self.state.reservations.insert(
            id,
            Reservation {
                id,
                name,
                owner: ctx.caller,
                key,
                kind,
                created_at: ctx.now,
            },
        );
        id
    }
}
