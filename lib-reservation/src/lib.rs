//! Name Reservation Ledger
//!
//! Ahead of a chain launch, users claim human-readable names and bind
//! each to a destination-chain public key. Reserved names can change
//! hands through a simple ascending-bid market with escrowed funds.
//!
//! # Flow
//!
//! 1. **Reserve**: a user claims a free name with a valid key
//! 2. **Bid**: anyone but the owner offers more than the last bid, with
//!    the key they want installed
//! 3. **Sell**: the owner accepts; the bidder takes the name and key, the
//!    owner is paid less the sale fee
//! 4. **Launch**: the owner freezes the book for good
//!
//! Dapp reservations wait for the signatory's approval. Outbid bidders
//! are refunded at once; stale bids can be withdrawn.
//!
//! # Usage
//!
//! ```ignore
//! use lib_reservation::{CallContext, RegistryConfig, ReservationRegistry};
//!
//! let mut registry = ReservationRegistry::new(config, owner, custody, native, token)?;
//! let id = registry.reserve_user(CallContext::new(alice, now), "helloworld", key)?;
//! registry.bid(CallContext::new(bob, now).with_value(amount), id, bob_key)?;
//! let receipt = registry.sell(CallContext::new(alice, now), id)?;
//! ```

pub mod access;
pub mod clock;
pub mod config;
pub mod context;
pub mod errors;
pub mod escrow;
pub mod events;
pub mod key;
pub mod name;
pub mod registry;
pub mod service;
pub mod snapshot;
pub mod types;

pub use access::AccessState;
pub use clock::{AuctionClock, Clock, ManualClock, SystemClock};
pub use config::{ConfigError, RegistryConfig};
pub use context::CallContext;
pub use errors::{InvariantViolation, RegistryResult, ReservationError};
pub use escrow::{EscrowError, EscrowLedger};
pub use events::RegistryEvent;
pub use key::{KeyError, KeyValidator, RegistrationKey};
pub use name::{Name, NameError, NameValidator};
pub use registry::{RegistryState, ReservationRegistry};
pub use service::ReservationService;
pub use snapshot::{RegistrySnapshot, SnapshotError, SnapshotResult};
pub use types::{
    ApprovalState, Bid, ForcedName, Reservation, ReservationKind, SaleReceipt, Transferrable,
    GENESIS_RESERVATION_ID,
};
