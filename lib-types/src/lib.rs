//! Reservation ledger primitives.
//! Stable, protocol-neutral, behavior-free.

pub mod primitives;

pub use primitives::{
    milli_native, Address, Amount, Bps, ReservationId, Timestamp, BPS_DENOMINATOR,
    NATIVE_DECIMALS, ONE_NATIVE,
};
