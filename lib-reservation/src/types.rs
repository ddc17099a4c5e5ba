//! Reservation Ledger Records

use lib_types::{Address, Amount, ReservationId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::key::RegistrationKey;
use crate::name::Name;

/// Id the counter starts at. Never assigned; the first reservation gets
/// `GENESIS_RESERVATION_ID + 1`.
pub const GENESIS_RESERVATION_ID: ReservationId = 1;

// ============================================================================
// Reservation kinds
// ============================================================================

/// Where a dapp reservation stands in the approval workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalState {
    Pending,
    Approved,
    /// Only reported as a decision outcome; denied records are deleted
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationKind {
    User,
    Dapp(ApprovalState),
}

impl ReservationKind {
    /// User reservations and approved dapps are live; pending dapps only
    /// hold their name and key
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ReservationKind::User | ReservationKind::Dapp(ApprovalState::Approved)
        )
    }
}

// ============================================================================
// Records
// ============================================================================

/// A claimed name bound to an owner and a registration key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub name: Name,
    pub owner: Address,
    pub key: RegistrationKey,
    pub kind: ReservationKind,
    pub created_at: Timestamp,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.kind.is_active()
    }
}

/// The single outstanding offer on a reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub bidder: Address,
    pub amount: Amount,
    /// Key that replaces the reservation's key if the sale goes through
    pub key: RegistrationKey,
    pub placed_at: Timestamp,
}

/// A name held back by the signatory. Has no id, owner or key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedName {
    pub name: Name,
    pub reserved_by: Address,
    pub reserved_at: Timestamp,
}

/// Outcome of a completed sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub id: ReservationId,
    pub seller: Address,
    pub buyer: Address,
    pub price: Amount,
    pub fee: Amount,
    pub seller_proceeds: Amount,
}

/// Treasury amounts that may be moved out without touching funds owed
/// to bidders or sellers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transferrable {
    pub native: Amount,
    pub token: Amount,
}
