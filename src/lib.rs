//! Core library for a browser-extension wallet
//!
//! The wallet runs in three isolated execution contexts (a background
//! worker, the UI, and an injected page script) with no shared memory.
//! This crate provides the pieces that keep wallet state consistent across
//! them:
//!
//! - [`messaging`]: the serialized cross-context channel and the message
//!   bus layered on it (fire-and-forget, request/response, subscriptions)
//! - [`transactions`]: concurrent status polling, snapshot reconciliation,
//!   and the background tracking service that announces settlements
//! - [`tokens`]: the persisted token list with catalog merging and the
//!   reactive balance cache revalidated on intervals and bus events
//! - [`storage`]: namespaced JSON document persistence behind an injected
//!   backend
//! - [`providers`]: the per-network provider seam, with scripted mocks for
//!   deterministic tests
//!
//! ## Features
//!
//! - `http` (default): enables [`providers::http`], a `reqwest`-backed
//!   provider talking to a gateway JSON API. Without it the crate is
//!   transport-agnostic and callers supply their own provider
//!   implementations.
//!
//! ## Ownership model
//!
//! Each piece of state has exactly one mutating context: the background
//! context writes transaction state, the context running the balance
//! watcher writes the balance cache. Other contexts issue commands and
//! observe broadcasts over the bus, never direct access, so no
//! cross-context locking exists anywhere in this crate.

pub mod data_structures;
pub mod errors;
pub mod messaging;
pub mod providers;
pub mod services;
pub mod storage;
pub mod tokens;
pub mod transactions;
pub mod validation;

pub use data_structures::*;
pub use errors::*;
pub use messaging::{MessageBus, MessageChannel, MessageKind, MessageStream, WalletMessage};
pub use providers::{BalanceProvider, ProviderRegistry, StatusProvider};
pub use storage::{JsonStore, KeyValueStorage, MemoryKeyValueStorage};
pub use tokens::{BalanceWatcher, TokenStore};
pub use transactions::{poll_transaction_statuses, reconcile, TransactionTracker};
pub use validation::is_valid_address;
