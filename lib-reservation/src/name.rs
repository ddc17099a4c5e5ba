//! Name Validation
//!
//! Names are raw byte strings. Length is measured in bytes, so a
//! three-character CJK name is nine bytes long. Any script is accepted;
//! only control characters and whitespace are refused.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RegistryConfig;

/// Errors that can occur during name validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name is too short: {actual} bytes (minimum {min})")]
    TooShort { min: usize, actual: usize },

    #[error("Name is too long: {actual} bytes (maximum {max})")]
    TooLong { max: usize, actual: usize },

    #[error("Name contains a control or whitespace character at byte {offset}")]
    ForbiddenCharacter { offset: usize },

    #[error("Name is not valid UTF-8")]
    NotUtf8,
}

/// A validated reservation name
///
/// Only [`NameValidator`] constructs these, so holding a `Name` means the
/// bytes passed the configured rules.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Name(Vec<u8>);

impl Name {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<[u8]> for Name {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", String::from_utf8_lossy(&self.0))
    }
}

/// Byte-length and character rules for names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameValidator {
    min_len: usize,
    max_len: usize,
    require_utf8: bool,
}

impl NameValidator {
    pub fn new(min_len: usize, max_len: usize, require_utf8: bool) -> Self {
        Self {
            min_len,
            max_len,
            require_utf8,
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(
            config.min_name_len,
            config.max_name_len,
            config.require_utf8_names,
        )
    }

    /// Check `raw` against the rules and wrap it as a [`Name`]
    pub fn validate(&self, raw: &[u8]) -> Result<Name, NameError> {
        self.check(raw, self.min_len)
    }

    /// Rules for names held back by the signatory. Same as [`validate`]
    /// without the minimum length, so short names like `a` can be kept
    /// out of public reach.
    ///
    /// [`validate`]: NameValidator::validate
    pub fn validate_system(&self, raw: &[u8]) -> Result<Name, NameError> {
        self.check(raw, 1)
    }

    fn check(&self, raw: &[u8], min_len: usize) -> Result<Name, NameError> {
        if raw.is_empty() {
            return Err(NameError::Empty);
        }
        if raw.len() < min_len {
            return Err(NameError::TooShort {
                min: min_len,
                actual: raw.len(),
            });
        }
        if raw.len() > self.max_len {
            return Err(NameError::TooLong {
                max: self.max_len,
                actual: raw.len(),
            });
        }

        match std::str::from_utf8(raw) {
            Ok(text) => {
                if let Some((offset, _)) = text
                    .char_indices()
                    .find(|(_, c)| c.is_control() || c.is_whitespace())
                {
                    return Err(NameError::ForbiddenCharacter { offset });
                }
            }
            Err(_) if self.require_utf8 => return Err(NameError::NotUtf8),
            Err(_) => {
                if let Some(offset) = raw
                    .iter()
                    .position(|b| b.is_ascii_control() || b.is_ascii_whitespace())
                {
                    return Err(NameError::ForbiddenCharacter { offset });
                }
            }
        }

        Ok(Name(raw.to_vec()))
    }
}
