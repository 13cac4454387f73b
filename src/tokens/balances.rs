//! Reactive balance revalidation for the selected account
//!
//! Balances are derived state: ephemeral, keyed by token address, rebuilt
//! from the provider on every revalidation and never persisted. Two things
//! trigger a revalidation: a fixed interval, and a `TRANSACTION_SUCCESS`
//! broadcast on the bus. Both race against each other, and a generation
//! counter keeps that race safe: an in-flight pass whose generation is no
//! longer current discards its results instead of committing stale data,
//! and triggers that arrive while a pass runs coalesce into at most one
//! follow-up pass.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

use crate::data_structures::{AccountId, TokenWithBalance, Uint256};
use crate::messaging::{MessageBus, MessageKind};
use crate::providers::BalanceProvider;

use super::store::TokenStore;

/// Cadence of periodic revalidation
pub const REVALIDATION_INTERVAL: Duration = Duration::from_secs(30);

/// Revalidating balance cache for one selected account
///
/// Cheap to clone; clones share the cache, so one clone can run the
/// revalidation loop while others serve reads.
#[derive(Clone)]
pub struct BalanceWatcher {
    tokens: Arc<RwLock<TokenStore>>,
    provider: Arc<dyn BalanceProvider>,
    account: AccountId,
    balances: Arc<RwLock<HashMap<String, Uint256>>>,
    generation: Arc<AtomicU64>,
}

impl BalanceWatcher {
    pub fn new(
        tokens: Arc<RwLock<TokenStore>>,
        provider: Arc<dyn BalanceProvider>,
        account: AccountId,
    ) -> Self {
        Self {
            tokens,
            provider,
            account,
            balances: Arc::new(RwLock::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetch fresh balances for every tracked token on the account's network
    ///
    /// All fetches run concurrently. A token whose fetch fails is simply
    /// absent from the cache this round (distinct from a balance of zero)
    /// and gets retried on the next trigger. If a newer revalidation starts
    /// while this one is fetching, the stale results are discarded.
    pub async fn revalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let tokens = self
            .tokens
            .read()
            .await
            .tokens_for_network(&self.account.network_id);

        let fetches = tokens.iter().map(|token| {
            let provider = self.provider.clone();
            let account = self.account.clone();
            let address = token.address.clone();
            async move {
                let result = provider
                    .token_balance(&address, &account.address, &account.network_id)
                    .await;
                (address, result)
            }
        });
        let results = join_all(fetches).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("revalidation superseded, discarding stale balances");
            return;
        }

        let mut fresh = HashMap::new();
        for (address, result) in results {
            match result {
                Ok(balance) => {
                    fresh.insert(address, balance);
                }
                Err(error) => {
                    debug!(token = %address, %error, "balance fetch failed, absent this round");
                }
            }
        }
        *self.balances.write().await = fresh;
    }

    /// Balance-annotated view of the account's tokens, in display order
    ///
    /// `balance: None` means no fetch has succeeded yet for that token.
    pub async fn balances(&self) -> Vec<TokenWithBalance> {
        let tokens = self
            .tokens
            .read()
            .await
            .tokens_for_network(&self.account.network_id);
        let cache = self.balances.read().await;
        tokens
            .into_iter()
            .map(|details| TokenWithBalance {
                balance: cache.get(&details.address).copied(),
                details,
            })
            .collect()
    }

    /// Revalidate on a fixed cadence and on settlement broadcasts
    ///
    /// Runs until the bus closes or `shutdown` flips to true. Settlement
    /// messages that pile up while a pass is in flight are drained down to
    /// a single follow-up pass rather than stacking one pass per message.
    pub async fn run(
        self,
        bus: MessageBus,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut stream = bus.subscribe();
        // Holding the bus would keep our own subscription open past the
        // channel's death; the stream alone decides when we exit.
        drop(bus);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.revalidate().await;
                }
                message = stream.recv() => {
                    match message {
                        Some(message) if message.kind == MessageKind::TransactionSuccess => {
                            self.revalidate().await;
                            // Coalesce settlements that arrived mid-pass.
                            let mut rerun = false;
                            while let Some(queued) = stream.try_recv() {
                                rerun |= queued.kind == MessageKind::TransactionSuccess;
                            }
                            if rerun {
                                self.revalidate().await;
                            }
                        }
                        Some(_) => {}
                        None => {
                            info!("message bus closed, balance watcher exiting");
                            return;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("balance watcher shutting down");
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::TokenDetails;
    use crate::providers::MockProvider;
    use crate::storage::MemoryKeyValueStorage;

    fn watcher_with(provider: Arc<MockProvider>, tokens: Vec<TokenDetails>) -> BalanceWatcher {
        let store = TokenStore::new(tokens, Arc::new(MemoryKeyValueStorage::new()));
        BalanceWatcher::new(
            Arc::new(RwLock::new(store)),
            provider,
            AccountId::new("0x1", "mainnet"),
        )
    }

    #[tokio::test]
    async fn revalidation_fills_the_cache() {
        let provider = Arc::new(MockProvider::new());
        provider.set_balance("0xfee", Uint256::from(1_000_u64));
        provider.set_balance("0xda1", Uint256::zero());

        let watcher = watcher_with(
            provider,
            vec![
                TokenDetails::new("0xfee", "mainnet"),
                TokenDetails::new("0xda1", "mainnet"),
            ],
        );
        watcher.revalidate().await;

        let balances = watcher.balances().await;
        assert_eq!(balances[0].balance, Some(Uint256::from(1_000_u64)));
        // A fetched zero is a real balance, not absence.
        assert_eq!(balances[1].balance, Some(Uint256::zero()));
    }

    #[tokio::test]
    async fn unfetched_balance_is_distinct_from_zero() {
        let provider = Arc::new(MockProvider::new());
        let watcher = watcher_with(provider, vec![TokenDetails::new("0xfee", "mainnet")]);

        // No revalidation has run yet.
        let balances = watcher.balances().await;
        assert_eq!(balances[0].balance, None);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_token_absent_this_round() {
        let provider = Arc::new(MockProvider::new());
        provider.set_balance("0xfee", Uint256::from(5_u64));
        provider.set_balance("0xda1", Uint256::from(7_u64));
        provider.fail_token("0xda1");

        let watcher = watcher_with(
            provider.clone(),
            vec![
                TokenDetails::new("0xfee", "mainnet"),
                TokenDetails::new("0xda1", "mainnet"),
            ],
        );
        watcher.revalidate().await;

        let balances = watcher.balances().await;
        assert_eq!(balances[0].balance, Some(Uint256::from(5_u64)));
        assert_eq!(balances[1].balance, None);

        // The next round recovers once the provider does.
        provider.clear_failures();
        watcher.revalidate().await;
        let balances = watcher.balances().await;
        assert_eq!(balances[1].balance, Some(Uint256::from(7_u64)));
    }

    #[tokio::test]
    async fn only_selected_network_is_fetched() {
        let provider = Arc::new(MockProvider::new());
        provider.set_balance("0xfee", Uint256::from(1_u64));
        provider.set_balance("0x90e", Uint256::from(2_u64));

        let watcher = watcher_with(
            provider.clone(),
            vec![
                TokenDetails::new("0xfee", "mainnet"),
                TokenDetails::new("0x90e", "goerli"),
            ],
        );
        watcher.revalidate().await;

        assert_eq!(provider.balance_call_count(), 1);
        assert_eq!(watcher.balances().await.len(), 1);
    }
}
