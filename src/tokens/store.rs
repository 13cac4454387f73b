//! Persisted token list with catalog merging
//!
//! The store is seeded from the default catalog and persists only the
//! user-added remainder. On load, persisted custom tokens are unioned with
//! the current catalog, which may have been updated since the last run,
//! and anything whose identity matches a catalog entry is excluded from
//! what gets written back. A stale persisted copy of a catalog token can
//! therefore never shadow the updated catalog entry.
//!
//! Token order is externally meaningful (it is display order): catalog
//! entries first, then user additions in insertion order.

use std::sync::Arc;

use tracing::debug;

use crate::data_structures::TokenDetails;
use crate::errors::{StorageError, TokenError, WalletResult};
use crate::storage::{JsonStore, KeyValueStorage};
use crate::validation::is_valid_address;

/// Namespace of the persisted token document
pub const TOKENS_NAMESPACE: &str = "tokens";

/// Schema version of the persisted token document
pub const TOKENS_VERSION: u32 = 1;

/// Service object owning the token list
pub struct TokenStore {
    catalog: Vec<TokenDetails>,
    tokens: Vec<TokenDetails>,
    store: JsonStore<Vec<TokenDetails>>,
}

impl TokenStore {
    /// Seed a store from the default catalog and a storage backend
    ///
    /// The store starts with the catalog alone; call [`load`](Self::load)
    /// to merge in whatever a previous run persisted.
    pub fn new(catalog: Vec<TokenDetails>, storage: Arc<dyn KeyValueStorage>) -> Self {
        let store = JsonStore::new(storage, TOKENS_NAMESPACE, TOKENS_VERSION, Vec::new());
        Self {
            tokens: catalog.clone(),
            catalog,
            store,
        }
    }

    /// Merge persisted custom tokens with the current catalog
    pub async fn load(&mut self) -> Result<(), StorageError> {
        let persisted = self.store.load().await?;
        let mut merged = self.catalog.clone();
        for token in persisted {
            if !merged.iter().any(|known| known.same_token(&token)) {
                merged.push(token);
            }
        }
        debug!(count = merged.len(), "token list loaded");
        self.tokens = merged;
        Ok(())
    }

    /// Persist the non-catalog subset of the current list
    async fn persist(&self) -> Result<(), StorageError> {
        let custom: Vec<TokenDetails> = self
            .tokens
            .iter()
            .filter(|token| !self.catalog.iter().any(|entry| entry.same_token(token)))
            .cloned()
            .collect();
        self.store.save(&custom).await
    }

    /// Append a user-added token
    ///
    /// Fails with [`TokenError::InvalidAddress`] or
    /// [`TokenError::DuplicateToken`] without mutating the list. Insertion
    /// order is preserved.
    pub async fn add_token(&mut self, token: TokenDetails) -> WalletResult<()> {
        if !is_valid_address(&token.address) {
            return Err(TokenError::InvalidAddress(token.address).into());
        }
        if self.tokens.iter().any(|known| known.same_token(&token)) {
            return Err(TokenError::DuplicateToken {
                address: token.address,
                network_id: token.network_id,
            }
            .into());
        }
        self.tokens.push(token);
        self.persist().await?;
        Ok(())
    }

    /// Remove every token with this address
    ///
    /// Removal matches by address only: a token listed under the same
    /// address on a *different* network is removed as well. This mirrors
    /// how removal has always behaved even though add and merge use the
    /// full (address, network) identity. No-op when nothing matches.
    pub async fn remove_token(&mut self, address: &str) -> WalletResult<()> {
        let before = self.tokens.len();
        self.tokens.retain(|token| token.address != address);
        if self.tokens.len() != before {
            self.persist().await?;
        }
        Ok(())
    }

    /// The full token list in display order
    pub fn tokens(&self) -> &[TokenDetails] {
        &self.tokens
    }

    /// Tokens tracked on one network, in display order
    pub fn tokens_for_network(&self, network_id: &str) -> Vec<TokenDetails> {
        self.tokens
            .iter()
            .filter(|token| token.network_id == network_id)
            .cloned()
            .collect()
    }
}
