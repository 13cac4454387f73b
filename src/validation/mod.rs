//! Validation helpers for wallet inputs
//!
//! Lightweight, synchronous checks applied before any state mutates.

pub mod address;

pub use address::is_valid_address;
