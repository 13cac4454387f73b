//! HTTP provider backed by a gateway JSON API
//!
//! One instance serves one network's gateway. Status queries hit
//! `get_transaction_status`; balances go through a read-only
//! `call_contract` against the token's `balanceOf` entry point.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::data_structures::{TransactionStatusInfo, Uint256};
use crate::errors::ProviderError;

use super::{BalanceProvider, StatusProvider};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only contract call request
#[derive(Debug, Clone, Serialize)]
struct CallContractRequest {
    contract_address: String,
    entry_point_selector: String,
    calldata: Vec<String>,
}

/// Read-only contract call response
#[derive(Debug, Clone, Deserialize)]
struct CallContractResponse {
    result: Vec<String>,
}

/// Provider talking to one network's HTTP gateway
pub struct HttpProvider {
    client: Client,
    base_url: String,
}

impl HttpProvider {
    /// Connect to a gateway base URL (no trailing slash)
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|error| ProviderError::Request(error.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl StatusProvider for HttpProvider {
    async fn transaction_status(&self, hash: &str) -> Result<TransactionStatusInfo, ProviderError> {
        let url = format!(
            "{}/feeder_gateway/get_transaction_status?transactionHash={}",
            self.base_url, hash
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|error| ProviderError::Request(error.to_string()))?
            .error_for_status()
            .map_err(|error| ProviderError::Request(error.to_string()))?;

        response
            .json::<TransactionStatusInfo>()
            .await
            .map_err(|error| ProviderError::InvalidResponse(error.to_string()))
    }
}

#[async_trait]
impl BalanceProvider for HttpProvider {
    async fn token_balance(
        &self,
        token_address: &str,
        wallet_address: &str,
        _network_id: &str,
    ) -> Result<Uint256, ProviderError> {
        let url = format!("{}/feeder_gateway/call_contract", self.base_url);
        let request = CallContractRequest {
            contract_address: token_address.to_string(),
            entry_point_selector: "balanceOf".to_string(),
            calldata: vec![wallet_address.to_string()],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|error| ProviderError::Request(error.to_string()))?
            .error_for_status()
            .map_err(|error| ProviderError::Request(error.to_string()))?;

        let call: CallContractResponse = response
            .json()
            .await
            .map_err(|error| ProviderError::InvalidResponse(error.to_string()))?;

        let word = call
            .result
            .first()
            .ok_or_else(|| ProviderError::InvalidResponse("empty call result".to_string()))?;
        Uint256::from_hex(word)
            .ok_or_else(|| ProviderError::InvalidResponse(format!("bad balance word '{word}'")))
    }
}
