//! Registry Snapshots
//!
//! Captures the full registry state so it can be persisted and restored.
//! The external ledgers are not part of a snapshot; they are supplied
//! again on restore.
//!
//! # Integrity
//!
//! `state_hash` is BLAKE3 over the bincode encoding of the custody address
//! and the state. BTreeMap iteration order makes the encoding
//! deterministic, so equal states always hash equally.

use std::path::Path;

use lib_tokens::{AssetLedger, TokenLedger};
use lib_types::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, RegistryConfig};
use crate::errors::InvariantViolation;
use crate::registry::{RegistryState, ReservationRegistry};

// =============================================================================
// SNAPSHOT ERRORS
// =============================================================================

/// Errors that can occur during snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// State hash mismatch during restore
    #[error("State hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    /// Invalid snapshot version
    #[error("Invalid snapshot version: {0}")]
    InvalidVersion(u32),

    /// Reading or writing the snapshot file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration supplied on restore is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Restored state disagrees with itself or with the supplied ledgers
    #[error("Restored state is inconsistent: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

// =============================================================================
// SNAPSHOT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub version: u32,
    pub custody: Address,
    pub state_hash: [u8; 32],
    pub state: RegistryState,
}

impl RegistrySnapshot {
    /// Current snapshot format version
    pub const VERSION: u32 = 1;

    pub fn new(custody: Address, state: RegistryState) -> SnapshotResult<Self> {
        let mut snapshot = Self {
            version: Self::VERSION,
            custody,
            state_hash: [0u8; 32],
            state,
        };
        snapshot.state_hash = snapshot.compute_state_hash()?;
        Ok(snapshot)
    }

    pub fn compute_state_hash(&self) -> SnapshotResult<[u8; 32]> {
        let encoded = bincode::serialize(&(&self.custody, &self.state))
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;
        Ok(blake3::hash(&encoded).into())
    }

    /// Check version and hash
    pub fn verify(&self) -> SnapshotResult<()> {
        if self.version != Self::VERSION {
            return Err(SnapshotError::InvalidVersion(self.version));
        }
        let computed = self.compute_state_hash()?;
        if computed != self.state_hash {
            return Err(SnapshotError::HashMismatch {
                expected: hex::encode(self.state_hash),
                actual: hex::encode(computed),
            });
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> SnapshotResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| SnapshotError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> SnapshotResult<Self> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::Serialization(e.to_string()))
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> SnapshotResult<()> {
        std::fs::write(path.as_ref(), self.to_bytes()?)?;
        tracing::info!(
            "Saved registry snapshot to {:?} (hash {})",
            path.as_ref(),
            hex::encode(&self.state_hash[..8])
        );
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> SnapshotResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }
}

// =============================================================================
// CAPTURE AND RESTORE
// =============================================================================

impl<N: AssetLedger, T: TokenLedger> ReservationRegistry<N, T> {
    pub fn snapshot(&self) -> SnapshotResult<RegistrySnapshot> {
        RegistrySnapshot::new(self.custody(), self.state().clone())
    }

    /// Rebuild a registry from a verified snapshot
    pub fn restore(
        snapshot: RegistrySnapshot,
        config: RegistryConfig,
        native: N,
        token: T,
    ) -> SnapshotResult<Self> {
        snapshot.verify()?;
        tracing::info!(
            "Restoring registry from snapshot {} ({} reservations)",
            hex::encode(&snapshot.state_hash[..8]),
            snapshot.state.reservations.len()
        );
        let registry = Self::from_state(config, snapshot.custody, snapshot.state, native, token)?;
        registry.check_invariants().map_err(|violation| {
            tracing::warn!("Snapshot restore rejected: {}", violation);
            violation
        })?;
        Ok(registry)
    }
}
