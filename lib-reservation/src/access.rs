//! Access Control
//!
//! Two roles: the owner (fixed at construction) and the signatory
//! (assigned later). The launch flag is one-way; once set, every
//! reservation and auction mutation is refused.

use lib_types::Address;
use serde::{Deserialize, Serialize};

use crate::errors::{RegistryResult, ReservationError};

/// Role assignments and the launch flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessState {
    owner: Address,
    signatory: Option<Address>,
    launched: bool,
}

impl AccessState {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            signatory: None,
            launched: false,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn signatory(&self) -> Option<Address> {
        self.signatory
    }

    pub fn is_launched(&self) -> bool {
        self.launched
    }

    pub fn is_signatory(&self, caller: &Address) -> bool {
        self.signatory.as_ref() == Some(caller)
    }

    pub fn ensure_not_launched(&self) -> RegistryResult<()> {
        if self.launched {
            return Err(ReservationError::SystemLaunched);
        }
        Ok(())
    }

    pub fn ensure_owner(&self, caller: &Address, action: &str) -> RegistryResult<()> {
        if *caller != self.owner {
            return Err(ReservationError::unauthorized(format!(
                "only the owner may {}",
                action
            )));
        }
        Ok(())
    }

    pub fn ensure_signatory(&self, caller: &Address, action: &str) -> RegistryResult<()> {
        if !self.is_signatory(caller) {
            return Err(ReservationError::unauthorized(format!(
                "only the signatory may {}",
                action
            )));
        }
        Ok(())
    }

    pub fn ensure_owner_or_signatory(&self, caller: &Address, action: &str) -> RegistryResult<()> {
        if *caller != self.owner && !self.is_signatory(caller) {
            return Err(ReservationError::unauthorized(format!(
                "only the owner or signatory may {}",
                action
            )));
        }
        Ok(())
    }

    /// Assign the signatory. The owner makes the first assignment; after
    /// that only the sitting signatory can hand the role on.
    ///
    /// Returns the previous signatory.
    pub fn set_signatory(
        &mut self,
        caller: &Address,
        new_signatory: Address,
    ) -> RegistryResult<Option<Address>> {
        match self.signatory {
            None => self.ensure_owner(caller, "assign the first signatory")?,
            Some(_) => self.ensure_signatory(caller, "replace the signatory")?,
        }
        if new_signatory.is_zero() {
            return Err(ReservationError::ZeroAddress);
        }
        Ok(self.signatory.replace(new_signatory))
    }

    /// Apply a launch request from `caller`. Returns whether the flag changed.
    pub fn set_launched(&mut self, caller: &Address, launched: bool) -> RegistryResult<bool> {
        self.ensure_owner(caller, "change the launch state")?;
        self.ensure_not_launched()?;
        if !launched {
            return Ok(false);
        }
        self.launched = true;
        Ok(true)
    }
}
