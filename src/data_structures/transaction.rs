//! Tracked transactions and their observed status
//!
//! A transaction's identity is the pair (hash, owning account) and never
//! changes after creation; only `status` and `failure_reason` mutate as the
//! network settles it. The background context is the sole writer of
//! transaction state; other contexts observe it through bus broadcasts.

use serde::{Deserialize, Serialize};

use super::account::AccountId;

/// Settlement status of a tracked transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[serde(rename = "RECEIVED")]
    Received,
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "ACCEPTED_ON_L2")]
    AcceptedOnL2,
    #[serde(rename = "ACCEPTED_ON_L1")]
    AcceptedOnL1,
    #[serde(rename = "REJECTED")]
    Rejected,
}

impl TransactionStatus {
    /// Whether this status is a terminal success
    ///
    /// Terminal successes are what triggers a `TRANSACTION_SUCCESS` broadcast
    /// and, downstream, a balance revalidation.
    pub fn is_settled_success(&self) -> bool {
        matches!(self, Self::AcceptedOnL2 | Self::AcceptedOnL1)
    }
}

/// A transaction tracked by the background context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub account: AccountId,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl Transaction {
    pub fn new(hash: impl Into<String>, account: AccountId, status: TransactionStatus) -> Self {
        Self {
            hash: hash.into(),
            account,
            status,
            failure_reason: None,
        }
    }

    /// Whether two records describe the same transaction
    ///
    /// Hashes are only unique per network, so the owning account is part of
    /// the identity.
    pub fn same_identity(&self, other: &Transaction) -> bool {
        self.hash == other.hash && self.account == other.account
    }

    /// The immutable identity of this transaction
    pub fn identity(&self) -> TransactionIdentity {
        TransactionIdentity {
            hash: self.hash.clone(),
            account: self.account.clone(),
        }
    }
}

/// Identity-only view of a transaction, broadcast on settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionIdentity {
    pub hash: String,
    pub account: AccountId,
}

/// Freshly observed status as reported by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatusInfo {
    pub tx_status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_failure_reason: Option<String>,
}
