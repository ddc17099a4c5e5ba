//! Canonical Primitive Types for the Reservation Ledger
//!
//! These types are the foundational building blocks for all ledger state.
//! They are designed to be:
//! - Fixed-size (no dynamic allocation)
//! - Deterministically serializable
//! - Efficient to copy and compare

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TYPE ALIASES
// ============================================================================

/// Asset amounts in base units (18 decimals for the native currency)
pub type Amount = u128;

/// Unix timestamp in seconds
pub type Timestamp = u64;

/// Identifier of a reservation record. Monotonic, never reused.
pub type ReservationId = u64;

/// Basis points for percentage calculations (10000 = 100%)
pub type Bps = u16;

/// Decimal places of the native currency
pub const NATIVE_DECIMALS: u32 = 18;

/// One whole native unit expressed in base units
pub const ONE_NATIVE: Amount = 1_000_000_000_000_000_000;

/// Basis point denominator
pub const BPS_DENOMINATOR: Amount = 10_000;

/// Convert a fraction of a native unit (given in milli-units) to base units.
///
/// `milli_native(10)` is 0.01 native.
pub const fn milli_native(milli: u64) -> Amount {
    (milli as Amount) * (ONE_NATIVE / 1_000)
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// 32-byte account address
///
/// The all-zero address is the "nobody" sentinel returned by read paths
/// for unknown or unowned records.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Create a new Address from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a zeroed Address
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Derive an address from arbitrary seed material (BLAKE3 of the seed)
    pub fn derive(seed: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"RESERVATION_LEDGER_ADDRESS_V1");
        hasher.update(seed);
        Self(hasher.finalize().into())
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a 64-character hex string
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
