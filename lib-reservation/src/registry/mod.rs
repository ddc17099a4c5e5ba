//! Reservation Registry
//!
//! Authoritative state for name reservations and the auction market on
//! top of them:
//! - User and dapp reservations, one owner and one key per name
//! - System (forced) reservations that block a name without an owner
//! - A single ascending bid per reservation, held in escrow
//! - Owner-accepted sales, with a fee retained for the treasury
//! - Signatory-controlled treasury withdrawals
//! - A one-way launch switch that freezes the book
//!
//! # Components
//!
//! - [`reserve`]: user, dapp and forced reservations
//! - [`dapp`]: signatory approval workflow
//! - [`bidding`]: bid and unbid
//! - [`settlement`]: sell
//! - [`treasury`]: transferrable amounts and withdrawals
//! - [`credits`]: value that could not be returned, held for its sender
//! - [`admin`]: signatory assignment and launch
//!
//! Every operation validates fully before touching state. Operations that
//! pay out stage their escrow change on a copy, make the external transfer,
//! and only commit if it succeeded.

mod admin;
mod bidding;
mod credits;
mod dapp;
mod reserve;
mod settlement;
mod treasury;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use lib_tokens::{AssetLedger, TokenLedger};
use lib_types::{Address, Amount, ReservationId};
use serde::{Deserialize, Serialize};

use crate::access::AccessState;
use crate::clock::AuctionClock;
use crate::config::{ConfigError, RegistryConfig};
use crate::errors::{InvariantViolation, RegistryResult, ReservationError};
use crate::escrow::EscrowLedger;
use crate::events::RegistryEvent;
use crate::key::{KeyValidator, RegistrationKey};
use crate::name::{Name, NameValidator};
use crate::types::{Bid, ForcedName, Reservation, GENESIS_RESERVATION_ID};

// ============================================================================
// State
// ============================================================================

/// Everything the registry persists
///
/// The name and key indexes cover every stored reservation, pending dapps
/// included, so a pending request blocks both its name and its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    pub(crate) reservations: BTreeMap<ReservationId, Reservation>,
    pub(crate) names: BTreeMap<Name, ReservationId>,
    pub(crate) keys: BTreeMap<RegistrationKey, ReservationId>,
    pub(crate) forced: BTreeMap<Name, ForcedName>,
    pub(crate) bids: BTreeMap<ReservationId, Bid>,
    pub(crate) credits: BTreeMap<Address, Amount>,
    pub(crate) last_id: ReservationId,
    pub(crate) access: AccessState,
    pub(crate) escrow: EscrowLedger,
    pub(crate) events: Vec<RegistryEvent>,
}

impl RegistryState {
    pub fn new(owner: Address) -> Self {
        Self {
            reservations: BTreeMap::new(),
            names: BTreeMap::new(),
            keys: BTreeMap::new(),
            forced: BTreeMap::new(),
            bids: BTreeMap::new(),
            credits: BTreeMap::new(),
            last_id: GENESIS_RESERVATION_ID,
            access: AccessState::new(owner),
            escrow: EscrowLedger::new(),
            events: Vec::new(),
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// The reservation ledger
///
/// `N` moves native value in and out of the `custody` account; `T` is the
/// fungible token ledger the treasury can withdraw from.
pub struct ReservationRegistry<N: AssetLedger, T: TokenLedger> {
    config: RegistryConfig,
    name_rules: NameValidator,
    key_rules: KeyValidator,
    clock: AuctionClock,
    custody: Address,
    state: RegistryState,
    native: N,
    token: T,
}

impl<N: AssetLedger, T: TokenLedger> ReservationRegistry<N, T> {
    pub fn new(
        config: RegistryConfig,
        owner: Address,
        custody: Address,
        native: N,
        token: T,
    ) -> Result<Self, ConfigError> {
        Self::from_state(config, custody, RegistryState::new(owner), native, token)
    }

    pub(crate) fn from_state(
        config: RegistryConfig,
        custody: Address,
        state: RegistryState,
        native: N,
        token: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!(
            "Reservation registry ready: owner={}, custody={}, {} reservations",
            state.access.owner(),
            custody,
            state.reservations.len()
        );
        Ok(Self {
            name_rules: NameValidator::from_config(&config),
            key_rules: KeyValidator::from_config(&config),
            clock: AuctionClock::new(config.stale_bid_window_secs),
            config,
            custody,
            state,
            native,
            token,
        })
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Whether `name` is claimed by any reservation, pending dapps and
    /// system reservations included
    pub fn exists(&self, name: impl AsRef<[u8]>) -> bool {
        let name = name.as_ref();
        self.state.names.contains_key(name) || self.state.forced.contains_key(name)
    }

    /// Owner of reservation `id`, or the zero address
    pub fn reservation_owner(&self, id: ReservationId) -> Address {
        self.state
            .reservations
            .get(&id)
            .map(|r| r.owner)
            .unwrap_or_else(Address::zero)
    }

    /// Current high bidder on `id`, or the zero address
    pub fn bid_owner(&self, id: ReservationId) -> Address {
        self.state
            .bids
            .get(&id)
            .map(|b| b.bidder)
            .unwrap_or_else(Address::zero)
    }

    /// Last allocated id
    pub fn current_id(&self) -> ReservationId {
        self.state.last_id
    }

    /// Signatory, or the zero address if none has been assigned
    pub fn get_signatory(&self) -> Address {
        self.state.access.signatory().unwrap_or_else(Address::zero)
    }

    pub fn owner(&self) -> Address {
        self.state.access.owner()
    }

    pub fn reservation(&self, id: ReservationId) -> Option<&Reservation> {
        self.state.reservations.get(&id)
    }

    pub fn current_bid(&self, id: ReservationId) -> Option<&Bid> {
        self.state.bids.get(&id)
    }

    /// Funds held for `who` that could not be handed back
    pub fn credit_of(&self, who: &Address) -> Amount {
        self.state.credits.get(who).copied().unwrap_or(0)
    }

    pub fn reservation_id_of(&self, name: impl AsRef<[u8]>) -> Option<ReservationId> {
        self.state.names.get(name.as_ref()).copied()
    }

    pub fn forced_name(&self, name: impl AsRef<[u8]>) -> Option<&ForcedName> {
        self.state.forced.get(name.as_ref())
    }

    pub fn reservations(&self) -> impl Iterator<Item = &Reservation> {
        self.state.reservations.values()
    }

    pub fn is_launched(&self) -> bool {
        self.state.access.is_launched()
    }

    pub fn escrow(&self) -> &EscrowLedger {
        &self.state.escrow
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn auction_clock(&self) -> &AuctionClock {
        &self.clock
    }

    pub fn custody(&self) -> Address {
        self.custody
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    pub fn native_mut(&mut self) -> &mut N {
        &mut self.native
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    pub fn events(&self) -> &[RegistryEvent] {
        &self.state.events
    }

    /// Drain the event log
    pub fn take_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.state.events)
    }

    // ------------------------------------------------------------------------
    // Audit
    // ------------------------------------------------------------------------

    /// Cross-check indexes, bids, credits and escrow against each other and
    /// against the custody balance
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let state = &self.state;

        for (index, entries) in [("name", state.names.len()), ("key", state.keys.len())] {
            if entries != state.reservations.len() {
                return Err(InvariantViolation::IndexSize {
                    index,
                    entries,
                    reservations: state.reservations.len(),
                });
            }
        }

        let mut seen_keys = BTreeSet::new();
        for (id, reservation) in &state.reservations {
            if *id > state.last_id || *id <= GENESIS_RESERVATION_ID {
                return Err(InvariantViolation::IdOutOfRange {
                    id: *id,
                    first: GENESIS_RESERVATION_ID + 1,
                    last: state.last_id,
                });
            }
            if state.names.get(&reservation.name) != Some(id) {
                return Err(InvariantViolation::IndexOutOfSync { index: "name", id: *id });
            }
            if state.keys.get(&reservation.key) != Some(id) {
                return Err(InvariantViolation::IndexOutOfSync { index: "key", id: *id });
            }
            if state.forced.contains_key(&reservation.name) {
                return Err(InvariantViolation::ShadowedSystemName(
                    reservation.name.to_string(),
                ));
            }
            if !seen_keys.insert(&reservation.key) {
                return Err(InvariantViolation::DuplicateKey(reservation.key.to_string()));
            }
        }

        let mut live: Amount = 0;
        for (id, bid) in &state.bids {
            match state.reservations.get(id) {
                Some(r) if r.is_active() => {}
                _ => return Err(InvariantViolation::OrphanBid(*id)),
            }
            live = live
                .checked_add(bid.amount)
                .ok_or(InvariantViolation::Overflow("bids"))?;
        }
        if live != state.escrow.outstanding_bids() {
            return Err(InvariantViolation::BidTotalMismatch {
                live,
                tracked: state.escrow.outstanding_bids(),
            });
        }

        let mut credited: Amount = 0;
        for amount in state.credits.values() {
            credited = credited
                .checked_add(*amount)
                .ok_or(InvariantViolation::Overflow("credits"))?;
        }
        // Proceeds are paid within the sale, so between calls only credits remain
        if credited != state.escrow.pending_proceeds() {
            return Err(InvariantViolation::CreditTotalMismatch {
                credited,
                tracked: state.escrow.pending_proceeds(),
            });
        }

        if !state.escrow.check_invariant() {
            return Err(InvariantViolation::EscrowShortfall {
                held: state.escrow.held(),
                owed: state.escrow.owed(),
            });
        }
        let balance = self.native.balance_of(&self.custody);
        if balance < state.escrow.held() {
            return Err(InvariantViolation::CustodyShortfall {
                balance,
                held: state.escrow.held(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------------

    fn ensure_name_free(&self, name: &Name) -> RegistryResult<()> {
        if self.state.names.contains_key(name) || self.state.forced.contains_key(name) {
            tracing::debug!("Name '{}' already taken", name);
            return Err(ReservationError::NameTaken {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Active reservation `id`, or `NotFound` for missing and pending records
    fn active_reservation(&self, id: ReservationId) -> RegistryResult<&Reservation> {
        self.state
            .reservations
            .get(&id)
            .filter(|r| r.is_active())
            .ok_or(ReservationError::NotFound(id))
    }

    fn emit(&mut self, event: RegistryEvent) {
        tracing::debug!("Registry event: {}", event);
        self.state.events.push(event);
    }
}
