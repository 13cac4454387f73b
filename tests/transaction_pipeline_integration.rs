//! End-to-end tests for the status → reconcile → broadcast → revalidate
//! pipeline
//!
//! These wire real buses over an in-process duplex channel: the transaction
//! tracker lives on the background end, the balance watcher subscribes on
//! the UI end, and the only coupling between them is the serialized
//! `TRANSACTION_SUCCESS` broadcast, exactly the production topology.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};

use extension_wallet_core::data_structures::{
    AccountId, TokenDetails, Transaction, TransactionStatus, Uint256,
};
use extension_wallet_core::messaging::{MessageBus, MessageChannel};
use extension_wallet_core::providers::{MockProvider, ProviderRegistry};
use extension_wallet_core::storage::MemoryKeyValueStorage;
use extension_wallet_core::tokens::{BalanceWatcher, TokenStore};
use extension_wallet_core::transactions::{
    poll_transaction_statuses, reconcile, TransactionTracker,
};

/// An interval long enough that only the startup tick fires during a test.
const QUIET_INTERVAL: Duration = Duration::from_secs(3600);

fn account() -> AccountId {
    AccountId::new("0x1", "main")
}

async fn wait_for_balance_calls(provider: &MockProvider, expected: u64) {
    for _ in 0..100 {
        if provider.balance_call_count() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {} balance calls, saw {}",
        expected,
        provider.balance_call_count()
    );
}

#[tokio::test]
async fn settlement_triggers_exactly_one_revalidation() {
    let (background_end, ui_end) = MessageChannel::duplex();
    let background_bus = MessageBus::new(background_end);
    let ui_bus = MessageBus::new(ui_end);

    // Background context: one pending transaction about to settle.
    let status_provider = Arc::new(MockProvider::new());
    status_provider.set_status("0xabc", TransactionStatus::AcceptedOnL2, None);
    let mut registry = ProviderRegistry::new();
    registry.register("main", status_provider);

    let mut tracker = TransactionTracker::new(registry, background_bus);
    tracker.track(Transaction::new(
        "0xabc",
        account(),
        TransactionStatus::Pending,
    ));

    // UI context: one tracked token, watcher subscribed to settlements.
    let balance_provider = Arc::new(MockProvider::new());
    balance_provider.set_balance("0x70c", Uint256::from(9_u64));
    let store = TokenStore::new(
        vec![TokenDetails::new("0x70c", "main")],
        Arc::new(MemoryKeyValueStorage::new()),
    );
    let watcher = BalanceWatcher::new(
        Arc::new(RwLock::new(store)),
        balance_provider.clone(),
        account(),
    );

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(watcher.clone().run(ui_bus, QUIET_INTERVAL, shutdown_rx));

    // The startup tick performs the initial fetch.
    wait_for_balance_calls(&balance_provider, 1).await;

    // One polling round settles the transaction and announces it.
    let changed = tracker.poll_once().await;
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].status, TransactionStatus::AcceptedOnL2);

    // The announcement triggers exactly one revalidation pass.
    wait_for_balance_calls(&balance_provider, 2).await;

    // A converged follow-up round announces nothing, so no further pass runs.
    assert!(tracker.poll_once().await.is_empty());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(balance_provider.balance_call_count(), 2);

    let balances = watcher.balances().await;
    assert_eq!(balances[0].balance, Some(Uint256::from(9_u64)));
}

#[tokio::test]
async fn failed_query_spares_the_rest_of_the_round() {
    let provider = Arc::new(MockProvider::new());
    provider.set_status("0xgood", TransactionStatus::AcceptedOnL2, None);
    provider.set_status("0xflaky", TransactionStatus::AcceptedOnL1, None);
    provider.fail_hash("0xflaky");

    let mut registry = ProviderRegistry::new();
    registry.register("main", provider.clone());

    let tracked = vec![
        Transaction::new("0xflaky", account(), TransactionStatus::Pending),
        Transaction::new("0xgood", account(), TransactionStatus::Pending),
    ];

    let candidates = poll_transaction_statuses(&tracked, &registry).await;
    let changed = reconcile(&tracked, candidates);

    // The failed query is absent, not changed and not errored.
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].hash, "0xgood");

    // Next round, the flaky provider recovers and the update lands.
    provider.clear_failures();
    let candidates = poll_transaction_statuses(&tracked, &registry).await;
    let changed = reconcile(&tracked, candidates);
    assert_eq!(changed.len(), 2);
}

#[tokio::test]
async fn tracker_loop_converges_and_announces_once() {
    let (background_end, ui_end) = MessageChannel::duplex();
    let background_bus = MessageBus::new(background_end);
    let ui_bus = MessageBus::new(ui_end);

    let provider = Arc::new(MockProvider::new());
    provider.set_status("0xabc", TransactionStatus::AcceptedOnL1, None);
    let mut registry = ProviderRegistry::new();
    registry.register("main", provider.clone());

    let mut tracker = TransactionTracker::new(registry, background_bus);
    tracker.track(Transaction::new(
        "0xabc",
        account(),
        TransactionStatus::Pending,
    ));

    let mut events = ui_bus.subscribe();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let loop_task = tokio::spawn(tracker.run(Duration::from_millis(20), shutdown_rx));

    // The first round announces the settlement.
    let announcement = events.recv().await.unwrap();
    assert_eq!(
        announcement.kind,
        extension_wallet_core::messaging::MessageKind::TransactionSuccess
    );

    // Let several more rounds run: converged state stays silent.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(events.try_recv().is_none());
    assert!(provider.status_call_count() >= 3);

    shutdown_tx.send(true).unwrap();
    loop_task.await.unwrap();
}
