//! Shared data structures for the wallet core
//!
//! These types cross module boundaries and, in serialized form, context
//! boundaries. Their wire encoding is part of the closed vocabulary all
//! execution contexts agree on at build time, so the serde attributes here
//! are load-bearing.

pub mod account;
pub mod token;
pub mod transaction;
pub mod uint;

pub use account::AccountId;
pub use token::{TokenDetails, TokenWithBalance};
pub use transaction::{Transaction, TransactionIdentity, TransactionStatus, TransactionStatusInfo};
pub use uint::Uint256;
