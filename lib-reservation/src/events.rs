//! Registry Events
//!
//! Appended on every committed mutation. Rejected or rolled-back calls
//! leave no event behind.

use lib_types::{Address, Amount, ReservationId};
use serde::{Deserialize, Serialize};

use crate::key::RegistrationKey;
use crate::name::Name;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// User reservation created
    Reserved {
        id: ReservationId,
        name: Name,
        owner: Address,
        key: RegistrationKey,
    },

    /// Dapp reservation created, awaiting a decision
    DappRequested {
        id: ReservationId,
        name: Name,
        owner: Address,
        key: RegistrationKey,
    },

    DappApproved { id: ReservationId },

    /// Dapp reservation denied and deleted
    DappDenied { id: ReservationId, name: Name },

    NamesForceReserved { names: Vec<Name> },

    BidPlaced {
        id: ReservationId,
        bidder: Address,
        amount: Amount,
        key: RegistrationKey,
    },

    /// Previous high bid returned when outbid
    BidRefunded {
        id: ReservationId,
        bidder: Address,
        amount: Amount,
    },

    BidWithdrawn {
        id: ReservationId,
        bidder: Address,
        amount: Amount,
    },

    Sold {
        id: ReservationId,
        seller: Address,
        buyer: Address,
        price: Amount,
        fee: Amount,
    },

    /// Value that could not be returned, now owed to its sender
    Credited { to: Address, amount: Amount },

    CreditClaimed { to: Address, amount: Amount },

    SignatorySet {
        previous: Option<Address>,
        signatory: Address,
    },

    ChainLaunched,

    NativeTransferredOut { to: Address, amount: Amount },

    TokenTransferredOut { to: Address, amount: Amount },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Reserved { id, name, .. } => write!(f, "Reserved(id={}, name={})", id, name),
            RegistryEvent::DappRequested { id, name, .. } => {
                write!(f, "DappRequested(id={}, name={})", id, name)
            }
            RegistryEvent::DappApproved { id } => write!(f, "DappApproved(id={})", id),
            RegistryEvent::DappDenied { id, .. } => write!(f, "DappDenied(id={})", id),
            RegistryEvent::NamesForceReserved { names } => {
                write!(f, "NamesForceReserved(count={})", names.len())
            }
            RegistryEvent::BidPlaced { id, amount, .. } => {
                write!(f, "BidPlaced(id={}, amount={})", id, amount)
            }
            RegistryEvent::BidRefunded { id, amount, .. } => {
                write!(f, "BidRefunded(id={}, amount={})", id, amount)
            }
            RegistryEvent::BidWithdrawn { id, amount, .. } => {
                write!(f, "BidWithdrawn(id={}, amount={})", id, amount)
            }
            RegistryEvent::Sold { id, price, .. } => write!(f, "Sold(id={}, price={})", id, price),
            RegistryEvent::Credited { amount, .. } => write!(f, "Credited(amount={})", amount),
            RegistryEvent::CreditClaimed { amount, .. } => {
                write!(f, "CreditClaimed(amount={})", amount)
            }
            RegistryEvent::SignatorySet { signatory, .. } => {
                write!(f, "SignatorySet({})", hex::encode(&signatory.as_bytes()[..8]))
            }
            RegistryEvent::ChainLaunched => write!(f, "ChainLaunched"),
            RegistryEvent::NativeTransferredOut { amount, .. } => {
                write!(f, "NativeTransferredOut(amount={})", amount)
            }
            RegistryEvent::TokenTransferredOut { amount, .. } => {
                write!(f, "TokenTransferredOut(amount={})", amount)
            }
        }
    }
}
