//! Persistence layer for wallet state
//!
//! Each logical store owns one namespaced, JSON-encoded document in a
//! [`KeyValueStorage`] backend. Stores are explicit service objects with a
//! constructor-injected backend and an explicit lifecycle (seed defaults,
//! load, save). There are no module-level singletons, so tests can run
//! against an in-memory backend deterministically.

pub mod json_store;
pub mod key_value;

pub use json_store::JsonStore;
pub use key_value::{KeyValueStorage, MemoryKeyValueStorage};
