//! Error types for the extension wallet core
//!
//! Each concern carries its own `thiserror` enum; `WalletError` aggregates
//! them for callers that cross module boundaries. Validation failures are
//! returned as values so they can be handled uniformly on either side of a
//! context boundary, where panics and unwinding do not cross serialization.
//!
//! Per-transaction poll failures and per-token balance-fetch failures are
//! deliberately *not* part of this taxonomy: they are absorbed by the round
//! that observed them and retried on the next one.

use thiserror::Error;

/// Result type alias for wallet core operations
pub type WalletResult<T> = Result<T, WalletError>;

/// Top-level error type aggregating all wallet core failures
#[derive(Debug, Error)]
pub enum WalletError {
    /// Token list validation or persistence failure
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Cross-context messaging failure
    #[error(transparent)]
    Messaging(#[from] MessagingError),

    /// External provider failure
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Persisted document storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors surfaced synchronously by token list mutations
///
/// Both variants leave the token list untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token address failed format validation
    #[error("token address malformed: '{0}'")]
    InvalidAddress(String),

    /// A token with the same (address, network) identity is already tracked
    #[error("token already added: {address} on network '{network_id}'")]
    DuplicateToken { address: String, network_id: String },
}

/// Errors produced by the message bus
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagingError {
    /// No matching response arrived within the configured window
    #[error("no '{kind}' response within {timeout_ms}ms")]
    ResponseTimeout { kind: String, timeout_ms: u64 },

    /// The underlying channel closed while waiting for a message
    #[error("message channel closed")]
    ChannelClosed,

    /// The request kind has no `_RES` counterpart in the vocabulary
    #[error("message kind '{0}' has no response counterpart")]
    NoResponseKind(String),

    /// A response arrived but its payload could not be decoded
    #[error("response payload could not be decoded")]
    MalformedResponse,
}

/// Errors returned by network providers
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    /// The request failed (timeout, connectivity, unknown hash)
    #[error("provider request failed: {0}")]
    Request(String),

    /// No provider is registered for the requested network
    #[error("no provider registered for network '{0}'")]
    UnknownNetwork(String),

    /// The provider answered with a payload the core could not interpret
    #[error("provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors from the key-value persistence layer
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend rejected the operation
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A persisted document failed to encode or decode
    #[error("stored document could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),
}
