//! Ledger Errors

use lib_types::{Address, Amount};
use thiserror::Error;

/// Error reported by an asset ledger collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: Amount, need: Amount },

    #[error("Zero amount not allowed")]
    ZeroAmount,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Recipient {0} rejected the transfer")]
    RecipientRejected(Address),
}

/// Result type for ledger operations
pub type TokenResult<T> = Result<T, TokenError>;
