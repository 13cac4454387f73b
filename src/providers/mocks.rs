//! Mock providers for deterministic testing
//!
//! Scripted per-hash statuses and per-token balances, explicit failure
//! modes, and call counters so tests can assert exactly how many queries a
//! polling or revalidation round issued.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::data_structures::{TransactionStatus, TransactionStatusInfo, Uint256};
use crate::errors::ProviderError;

use super::{BalanceProvider, StatusProvider};

/// Scripted provider implementing both provider traits
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    statuses: Arc<Mutex<HashMap<String, TransactionStatusInfo>>>,
    balances: Arc<Mutex<HashMap<String, Uint256>>>,
    failing_hashes: Arc<Mutex<HashSet<String>>>,
    failing_tokens: Arc<Mutex<HashSet<String>>>,
    status_calls: Arc<Mutex<u64>>,
    balance_calls: Arc<Mutex<u64>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the status returned for a transaction hash
    pub fn set_status(
        &self,
        hash: impl Into<String>,
        status: TransactionStatus,
        failure_reason: Option<&str>,
    ) {
        self.statuses.lock().unwrap().insert(
            hash.into(),
            TransactionStatusInfo {
                tx_status: status,
                tx_failure_reason: failure_reason.map(str::to_string),
            },
        );
    }

    /// Script the balance returned for a token address
    pub fn set_balance(&self, token_address: impl Into<String>, balance: Uint256) {
        self.balances
            .lock()
            .unwrap()
            .insert(token_address.into(), balance);
    }

    /// Make status queries for `hash` fail until cleared
    pub fn fail_hash(&self, hash: impl Into<String>) {
        self.failing_hashes.lock().unwrap().insert(hash.into());
    }

    /// Make balance queries for `token_address` fail until cleared
    pub fn fail_token(&self, token_address: impl Into<String>) {
        self.failing_tokens
            .lock()
            .unwrap()
            .insert(token_address.into());
    }

    pub fn clear_failures(&self) {
        self.failing_hashes.lock().unwrap().clear();
        self.failing_tokens.lock().unwrap().clear();
    }

    /// Total status queries issued against this provider
    pub fn status_call_count(&self) -> u64 {
        *self.status_calls.lock().unwrap()
    }

    /// Total balance queries issued against this provider
    pub fn balance_call_count(&self) -> u64 {
        *self.balance_calls.lock().unwrap()
    }
}

#[async_trait]
impl StatusProvider for MockProvider {
    async fn transaction_status(&self, hash: &str) -> Result<TransactionStatusInfo, ProviderError> {
        *self.status_calls.lock().unwrap() += 1;
        if self.failing_hashes.lock().unwrap().contains(hash) {
            return Err(ProviderError::Request(format!(
                "scripted failure for {hash}"
            )));
        }
        self.statuses
            .lock()
            .unwrap()
            .get(hash)
            .cloned()
            .ok_or_else(|| ProviderError::Request(format!("unknown transaction {hash}")))
    }
}

#[async_trait]
impl BalanceProvider for MockProvider {
    async fn token_balance(
        &self,
        token_address: &str,
        _wallet_address: &str,
        _network_id: &str,
    ) -> Result<Uint256, ProviderError> {
        *self.balance_calls.lock().unwrap() += 1;
        if self.failing_tokens.lock().unwrap().contains(token_address) {
            return Err(ProviderError::Request(format!(
                "scripted failure for {token_address}"
            )));
        }
        self.balances
            .lock()
            .unwrap()
            .get(token_address)
            .copied()
            .ok_or_else(|| ProviderError::Request(format!("unknown token {token_address}")))
    }
}
