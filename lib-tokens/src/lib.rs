//! Asset ledger collaborators for the name reservation ledger.
//!
//! The reservation core consumes the native-currency ledger and the token
//! ledger only through the traits defined here.
//!
//! # Key Types
//!
//! - [`AssetLedger`]: balance query and fallible transfer
//! - [`TokenLedger`]: adds allowances and `transfer_from`
//! - [`TokenError`]: ledger failure taxonomy
//!
//! An in-memory implementation with failure injection is available behind
//! the `testing` feature.

pub mod errors;
pub mod ledger;

#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use errors::*;
pub use ledger::{AssetLedger, TokenLedger};

#[cfg(any(test, feature = "testing"))]
pub use memory::InMemoryLedger;
