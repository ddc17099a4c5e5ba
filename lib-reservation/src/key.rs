//! Identity Key Validation
//!
//! A registration key is the textual form of a compressed secp256k1
//! public key on the destination chain:
//!
//! ```text
//! <prefix> || base58( point[33] || ripemd160(point)[0..4] )
//! ```
//!
//! The base58 body is always 50 characters. Validation checks the prefix,
//! total length, alphabet, decoded length, point tag and checksum. It does
//! not check that the point lies on the curve.

use std::borrow::Borrow;
use std::fmt;

use ripemd::{Digest, Ripemd160};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RegistryConfig;

/// Length of the base58 body following the prefix
pub const KEY_BODY_CHARS: usize = 50;

/// Length of a compressed curve point
pub const COMPRESSED_POINT_BYTES: usize = 33;

/// Length of the trailing checksum
pub const CHECKSUM_BYTES: usize = 4;

/// Errors that can occur during key validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("Key must start with '{expected}'")]
    WrongPrefix { expected: String },

    #[error("Key must be {expected} characters long (got {actual})")]
    WrongLength { expected: usize, actual: usize },

    #[error("Key body is not valid base58")]
    NotBase58,

    #[error("Key body decodes to {actual} bytes (expected {expected})")]
    WrongDecodedLength { expected: usize, actual: usize },

    #[error("Key point tag 0x{0:02x} is not a compressed point")]
    BadPointTag(u8),

    #[error("Key checksum does not match")]
    BadChecksum,
}

/// A registration key that passed [`KeyValidator::validate`]
///
/// Compared and indexed by exact text.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegistrationKey(String);

impl RegistrationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RegistrationKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegistrationKey({})", self.0)
    }
}

/// Format and checksum rules for registration keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValidator {
    prefix: String,
}

impl KeyValidator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.key_prefix.clone())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Total character length of a well-formed key
    pub fn expected_len(&self) -> usize {
        self.prefix.len() + KEY_BODY_CHARS
    }

    pub fn validate(&self, raw: &str) -> Result<RegistrationKey, KeyError> {
        let body = raw.strip_prefix(self.prefix.as_str()).ok_or_else(|| {
            KeyError::WrongPrefix {
                expected: self.prefix.clone(),
            }
        })?;

        if raw.len() != self.expected_len() {
            return Err(KeyError::WrongLength {
                expected: self.expected_len(),
                actual: raw.len(),
            });
        }

        let decoded = bs58::decode(body)
            .into_vec()
            .map_err(|_| KeyError::NotBase58)?;

        let expected = COMPRESSED_POINT_BYTES + CHECKSUM_BYTES;
        if decoded.len() != expected {
            return Err(KeyError::WrongDecodedLength {
                expected,
                actual: decoded.len(),
            });
        }

        let (point, checksum) = decoded.split_at(COMPRESSED_POINT_BYTES);
        if !matches!(point[0], 0x02 | 0x03) {
            return Err(KeyError::BadPointTag(point[0]));
        }

        let digest = Ripemd160::digest(point);
        if digest[..CHECKSUM_BYTES] != *checksum {
            return Err(KeyError::BadChecksum);
        }

        Ok(RegistrationKey(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_A: &str = "EOS6U9WA3HUsP8BYJ8qiGqxFb9qkqAMEvUwVgdtiuTFTAj5qkvgi9";
    const KEY_B: &str = "EOS7inrrtWWojDfUFfriQvS5eNRG7GR9HzNXh9u2i3tAgc1oYd9YF";
    const ZERO_POINT_KEY: &str = "EOS4tVMTu4hrMTGeAQpAEzueCYqEESJQgkaH9DVJNnzK1mzLqr2dv";

    fn validator() -> KeyValidator {
        KeyValidator::new("EOS")
    }

    #[test]
    fn test_valid_keys() {
        let v = validator();
        assert_eq!(v.validate(KEY_A).unwrap().as_str(), KEY_A);
        assert!(v.validate(KEY_B).is_ok());
        assert!(v.validate(ZERO_POINT_KEY).is_ok());
        assert_eq!(v.expected_len(), 53);
    }

    #[test]
    fn test_wrong_prefix() {
        let key = KEY_A.replacen("EOS", "PUB", 1);
        assert_eq!(
            validator().validate(&key),
            Err(KeyError::WrongPrefix {
                expected: "EOS".to_string()
            })
        );
        assert!(matches!(
            validator().validate("badkey"),
            Err(KeyError::WrongPrefix { .. })
        ));
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            validator().validate(&KEY_A[..52]),
            Err(KeyError::WrongLength {
                expected: 53,
                actual: 52
            })
        );
        assert!(matches!(
            validator().validate("EOSbadkey"),
            Err(KeyError::WrongLength { .. })
        ));
    }

    #[test]
    fn test_not_base58() {
        // '0' is outside the bitcoin alphabet
        let key = format!("{}0{}", &KEY_A[..10], &KEY_A[11..]);
        assert_eq!(validator().validate(&key), Err(KeyError::NotBase58));
    }

    #[test]
    fn test_wrong_decoded_length() {
        let key = format!("EOS{}", "1".repeat(KEY_BODY_CHARS));
        assert_eq!(
            validator().validate(&key),
            Err(KeyError::WrongDecodedLength {
                expected: 37,
                actual: 50
            })
        );
    }

    #[test]
    fn test_uncompressed_point_tag() {
        // 0x04 tag with a correct checksum
        let key = "EOS8nRT6w9xXDfbgMYMimGrM1wFnD5ALFW2Gh7G6VUMGGnzkhCnZB";
        assert_eq!(validator().validate(key), Err(KeyError::BadPointTag(0x04)));
    }

    #[test]
    fn test_bad_checksum() {
        let key = "EOS4tVMTu4hrMTGeAQpAEzueCYqEESJQgkaH9DVJNnzK1mzLpN3Ma";
        assert_eq!(validator().validate(key), Err(KeyError::BadChecksum));
    }

    #[test]
    fn test_custom_prefix() {
        let v = KeyValidator::new("PUB");
        let key = KEY_A.replacen("EOS", "PUB", 1);
        assert!(v.validate(&key).is_ok());
        assert!(v.validate(KEY_A).is_err());
    }
}
