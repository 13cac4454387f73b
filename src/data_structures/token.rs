//! Token descriptions and balance-annotated views
//!
//! Token identity for merge and dedup purposes is (address, network id),
//! never full structural equality: a catalog update that renames a token
//! must still match the persisted entry it replaces.

use serde::{Deserialize, Serialize};

use super::uint::Uint256;

/// Description of a tracked token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<Uint256>,
    pub network_id: String,
}

impl TokenDetails {
    pub fn new(address: impl Into<String>, network_id: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
            symbol: None,
            decimals: None,
            network_id: network_id.into(),
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_decimals(mut self, decimals: impl Into<Uint256>) -> Self {
        self.decimals = Some(decimals.into());
        self
    }

    /// Identity equality: (address, network id)
    pub fn same_token(&self, other: &TokenDetails) -> bool {
        self.address == other.address && self.network_id == other.network_id
    }
}

/// A token annotated with its last revalidated balance
///
/// `balance` is `None` when no fetch has succeeded yet for this token, a
/// distinct state from a fetched balance of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenWithBalance {
    #[serde(flatten)]
    pub details: TokenDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Uint256>,
}
