//! External provider abstractions
//!
//! Providers answer blockchain queries for one network: transaction status
//! and token balances. The core never talks to a network directly; it
//! resolves a provider through the [`ProviderRegistry`] (account → network →
//! provider) and treats every call as fallible and independently retryable.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::data_structures::{TransactionStatusInfo, Uint256};
use crate::errors::ProviderError;

pub mod mocks;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpProvider;

pub use mocks::MockProvider;

/// Answers "what is the status of transaction X" for one network
#[async_trait]
pub trait StatusProvider: Send + Sync {
    async fn transaction_status(&self, hash: &str) -> Result<TransactionStatusInfo, ProviderError>;
}

/// Fetches a wallet's balance of one token on one network
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    async fn token_balance(
        &self,
        token_address: &str,
        wallet_address: &str,
        network_id: &str,
    ) -> Result<Uint256, ProviderError>;
}

/// Network id → status provider resolution
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn StatusProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the provider serving `network_id`, replacing any previous one
    pub fn register(&mut self, network_id: impl Into<String>, provider: Arc<dyn StatusProvider>) {
        self.providers.insert(network_id.into(), provider);
    }

    /// Resolve the provider for a network
    pub fn provider_for(&self, network_id: &str) -> Result<Arc<dyn StatusProvider>, ProviderError> {
        self.providers
            .get(network_id)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownNetwork(network_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::TransactionStatus;

    #[tokio::test]
    async fn registry_resolves_by_network() {
        let provider = Arc::new(MockProvider::new());
        provider.set_status("0xabc", TransactionStatus::Pending, None);

        let mut registry = ProviderRegistry::new();
        registry.register("mainnet", provider);

        let resolved = registry.provider_for("mainnet").unwrap();
        let info = resolved.transaction_status("0xabc").await.unwrap();
        assert_eq!(info.tx_status, TransactionStatus::Pending);
    }

    #[test]
    fn unknown_network_is_an_error() {
        let registry = ProviderRegistry::new();
        assert!(matches!(
            registry.provider_for("goerli"),
            Err(ProviderError::UnknownNetwork(_))
        ));
    }
}
