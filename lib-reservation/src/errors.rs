//! Reservation Ledger Errors
//!
//! Every rejection is a distinct variant so callers can branch on cause.

use lib_tokens::TokenError;
use lib_types::{Address, Amount, ReservationId, Timestamp};
use thiserror::Error;

use crate::escrow::EscrowError;
use crate::key::KeyError;
use crate::name::NameError;

/// Errors returned by registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    /// Name failed length or character rules
    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    /// Registration key failed format or checksum rules
    #[error("Invalid registration key: {0}")]
    InvalidKey(#[from] KeyError),

    /// Name is already reserved (by a user, dapp, or the system)
    #[error("Name '{name}' is already taken")]
    NameTaken { name: String },

    /// Key is already bound to another reservation
    #[error("Registration key {key} is already in use")]
    KeyTaken { key: String },

    /// Bid key equals the reservation's key or another active reservation's key
    #[error("Registration key {key} collides with an existing reservation")]
    KeyCollision { key: String },

    /// No active reservation (or no bid, for unbid) under this id
    #[error("Reservation {0} not found")]
    NotFound(ReservationId),

    /// Caller lacks the role required for this operation
    #[error("Not authorized: {reason}")]
    Unauthorized { reason: String },

    /// The one-way launch has happened; mutation is disabled
    #[error("System has launched; reservations are frozen")]
    SystemLaunched,

    /// Owner tried to bid on their own reservation
    #[error("Owner cannot bid on their own reservation")]
    SelfBid,

    /// Bid is below the fixed floor
    #[error("Bid of {offered} is below the minimum of {minimum}")]
    BelowMinimum { minimum: Amount, offered: Amount },

    /// Bid does not strictly exceed the current high bid
    #[error("Bid of {offered} does not exceed the current bid of {current}")]
    BidTooLow { current: Amount, offered: Amount },

    /// Bid is still inside the stale window
    #[error("Bid is not stale until {stale_at}")]
    NotStale { stale_at: Timestamp },

    /// Sale requested on a reservation with no bid
    #[error("Reservation {0} has no bid")]
    NoBid(ReservationId),

    /// Dapp reservation is not pending approval
    #[error("Dapp reservation {0} has already been decided")]
    AlreadyDecided(ReservationId),

    /// Attached value has not reached custody
    #[error("Bid value {value} is not in custody; only {unaccounted} unaccounted funds held")]
    ValueNotInCustody { value: Amount, unaccounted: Amount },

    /// Caller has no credited refund to claim
    #[error("No credited funds for {0}")]
    NothingToClaim(Address),

    /// Treasury withdrawal exceeds the surplus
    #[error("Requested {requested} exceeds transferrable {available}")]
    InsufficientTransferrable { requested: Amount, available: Amount },

    /// External payout failed; the operation was rolled back
    #[error("External transfer failed: {0}")]
    TransferFailed(#[from] TokenError),

    /// The zero address is not a valid target
    #[error("Zero address is not allowed")]
    ZeroAddress,

    /// Accounting change would break escrow conservation
    #[error("Escrow accounting error: {0}")]
    Escrow(#[from] EscrowError),
}

impl ReservationError {
    pub(crate) fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, ReservationError>;

/// A broken consistency rule found by
/// [`ReservationRegistry::check_invariants`](crate::ReservationRegistry::check_invariants)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{index} index holds {entries} entries for {reservations} reservations")]
    IndexSize {
        index: &'static str,
        entries: usize,
        reservations: usize,
    },

    #[error("{index} index does not point at reservation {id}")]
    IndexOutOfSync {
        index: &'static str,
        id: ReservationId,
    },

    #[error("Reservation id {id} outside {first}..={last}")]
    IdOutOfRange {
        id: ReservationId,
        first: ReservationId,
        last: ReservationId,
    },

    #[error("System name '{0}' is also reserved")]
    ShadowedSystemName(String),

    #[error("Key {0} is bound twice")]
    DuplicateKey(String),

    #[error("Bid on {0} has no active reservation")]
    OrphanBid(ReservationId),

    #[error("Live bids total {live} but escrow tracks {tracked}")]
    BidTotalMismatch { live: Amount, tracked: Amount },

    #[error("Credits total {credited} but escrow tracks {tracked} pending")]
    CreditTotalMismatch { credited: Amount, tracked: Amount },

    #[error("Escrow holds {held} but owes {owed}")]
    EscrowShortfall { held: Amount, owed: Amount },

    #[error("Custody balance {balance} below escrow held {held}")]
    CustodyShortfall { balance: Amount, held: Amount },

    #[error("Amount overflow while totalling {0}")]
    Overflow(&'static str),
}
