//! Message vocabulary and envelope
//!
//! Message kinds form a closed, versionless vocabulary agreed upon by all
//! execution contexts at build time; there is no schema negotiation.
//! Request/response pairing follows the `_RES` suffix convention on the
//! wire, with [`MessageKind::response_kind`] encoding the mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed vocabulary of cross-context message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "GET_MESSAGING_PUBLIC_KEY")]
    GetMessagingPublicKey,
    #[serde(rename = "GET_MESSAGING_PUBLIC_KEY_RES")]
    GetMessagingPublicKeyRes,
    #[serde(rename = "RESET_ALL")]
    ResetAll,
    #[serde(rename = "REMOVE_PREAUTHORIZATION")]
    RemovePreauthorization,
    #[serde(rename = "REMOVE_PREAUTHORIZATION_RES")]
    RemovePreauthorizationRes,
    #[serde(rename = "RESET_PREAUTHORIZATIONS")]
    ResetPreauthorizations,
    #[serde(rename = "TRANSACTION_SUCCESS")]
    TransactionSuccess,
    /// Dev-only control marker triggering a full context reload
    #[serde(rename = "RELOAD")]
    Reload,
}

impl MessageKind {
    /// The `_RES` counterpart of a request kind, if it has one
    pub fn response_kind(&self) -> Option<MessageKind> {
        match self {
            Self::GetMessagingPublicKey => Some(Self::GetMessagingPublicKeyRes),
            Self::RemovePreauthorization => Some(Self::RemovePreauthorizationRes),
            _ => None,
        }
    }

    /// Wire string for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetMessagingPublicKey => "GET_MESSAGING_PUBLIC_KEY",
            Self::GetMessagingPublicKeyRes => "GET_MESSAGING_PUBLIC_KEY_RES",
            Self::ResetAll => "RESET_ALL",
            Self::RemovePreauthorization => "REMOVE_PREAUTHORIZATION",
            Self::RemovePreauthorizationRes => "REMOVE_PREAUTHORIZATION_RES",
            Self::ResetPreauthorizations => "RESET_PREAUTHORIZATIONS",
            Self::TransactionSuccess => "TRANSACTION_SUCCESS",
            Self::Reload => "RELOAD",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope carried by the message channel
///
/// `correlation_id` is generated for request/response exchanges so that
/// concurrent requests of the same kind cannot be matched to the wrong
/// caller. Fire-and-forget messages leave it unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(rename = "correlationId", skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<u64>,
}

impl WalletMessage {
    /// A bare message of the given kind
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            data: None,
            correlation_id: None,
        }
    }

    /// A message carrying a JSON payload
    pub fn with_data(kind: MessageKind, data: serde_json::Value) -> Self {
        Self {
            kind,
            data: Some(data),
            correlation_id: None,
        }
    }

    /// Build the response to `request`, echoing its correlation id
    ///
    /// Returns `None` when the request kind has no `_RES` counterpart.
    pub fn response_to(request: &WalletMessage, data: Option<serde_json::Value>) -> Option<Self> {
        Some(Self {
            kind: request.kind.response_kind()?,
            data,
            correlation_id: request.correlation_id,
        })
    }

    /// Decode the payload into a concrete type, if present and well-formed
    pub fn decode_data<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.data
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
    }
}
