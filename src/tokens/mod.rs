//! Token list and reactive balance cache
//!
//! [`TokenStore`] owns the persisted token list: the default catalog merged
//! with user-added tokens. [`BalanceWatcher`] keeps an ephemeral balance
//! cache for the selected account, revalidated on a fixed cadence and on
//! every `TRANSACTION_SUCCESS` bus broadcast.

pub mod balances;
pub mod store;

pub use balances::{BalanceWatcher, REVALIDATION_INTERVAL};
pub use store::{TokenStore, TOKENS_NAMESPACE, TOKENS_VERSION};
