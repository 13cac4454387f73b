//! Account identity shared across execution contexts

use serde::{Deserialize, Serialize};

/// Identity of a wallet account: address plus the network it lives on
///
/// Used both as the owner of tracked transactions and as the selected
/// account a balance revalidation runs against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountId {
    pub address: String,
    pub network_id: String,
}

impl AccountId {
    pub fn new(address: impl Into<String>, network_id: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            network_id: network_id.into(),
        }
    }
}
