//! Background-context transaction tracking service
//!
//! The tracker owns the tracked transaction list; the background context
//! is the sole writer of transaction state. Other contexts observe changes
//! through bus broadcasts and issue commands over the bus, never by
//! touching the list directly.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::data_structures::{AccountId, Transaction};
use crate::messaging::{MessageBus, MessageKind, WalletMessage};
use crate::providers::ProviderRegistry;

use super::poller::poll_transaction_statuses;
use super::reconciler::reconcile;

/// Tracks pending transactions and announces their settlement
pub struct TransactionTracker {
    transactions: Vec<Transaction>,
    registry: ProviderRegistry,
    bus: MessageBus,
}

impl TransactionTracker {
    pub fn new(registry: ProviderRegistry, bus: MessageBus) -> Self {
        Self {
            transactions: Vec::new(),
            registry,
            bus,
        }
    }

    /// Start tracking a transaction; a known identity is ignored
    pub fn track(&mut self, transaction: Transaction) {
        if self
            .transactions
            .iter()
            .any(|tracked| tracked.same_identity(&transaction))
        {
            return;
        }
        self.transactions.push(transaction);
    }

    /// Drop every tracked transaction owned by `account`
    ///
    /// Used when the user clears history or resets wallet state.
    pub fn remove_for_account(&mut self, account: &AccountId) {
        self.transactions
            .retain(|transaction| &transaction.account != account);
    }

    /// Current snapshot of tracked transactions
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// One polling round: poll, diff, apply, announce
    ///
    /// Returns the transactions whose observable state changed. Every
    /// change that lands on a terminal success is broadcast exactly once as
    /// `TRANSACTION_SUCCESS`; the diff guarantees a repeat observation of
    /// the same status produces no second announcement.
    pub async fn poll_once(&mut self) -> Vec<Transaction> {
        let candidates = poll_transaction_statuses(&self.transactions, &self.registry).await;
        let changed = reconcile(&self.transactions, candidates);

        for update in &changed {
            if let Some(tracked) = self
                .transactions
                .iter_mut()
                .find(|tracked| tracked.same_identity(update))
            {
                tracked.status = update.status;
                tracked.failure_reason = update.failure_reason.clone();
            }
        }

        for update in &changed {
            if update.status.is_settled_success() {
                debug!(hash = %update.hash, status = ?update.status, "announcing settled transaction");
                if let Ok(identity) = serde_json::to_value(update.identity()) {
                    self.bus.send(WalletMessage::with_data(
                        MessageKind::TransactionSuccess,
                        identity,
                    ));
                }
            }
        }

        changed
    }

    /// Poll on a fixed cadence until `shutdown` flips to true
    pub async fn run(mut self, poll_interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("transaction tracker shutting down");
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data_structures::{TransactionIdentity, TransactionStatus};
    use crate::messaging::MessageChannel;
    use crate::providers::MockProvider;

    fn pending(hash: &str) -> Transaction {
        Transaction::new(
            hash,
            AccountId::new("0x1", "mainnet"),
            TransactionStatus::Pending,
        )
    }

    fn tracker_with(provider: Arc<MockProvider>) -> (TransactionTracker, MessageBus) {
        let (background_end, ui_end) = MessageChannel::duplex();
        let background_bus = MessageBus::new(background_end);
        let ui_bus = MessageBus::new(ui_end);

        let mut registry = ProviderRegistry::new();
        registry.register("mainnet", provider);
        (TransactionTracker::new(registry, background_bus), ui_bus)
    }

    #[tokio::test]
    async fn applies_changes_and_broadcasts_success() {
        let provider = Arc::new(MockProvider::new());
        provider.set_status("0xabc", TransactionStatus::AcceptedOnL2, None);

        let (mut tracker, ui_bus) = tracker_with(provider);
        let mut events = ui_bus.subscribe();
        tracker.track(pending("0xabc"));

        let changed = tracker.poll_once().await;
        assert_eq!(changed.len(), 1);
        assert_eq!(
            tracker.transactions()[0].status,
            TransactionStatus::AcceptedOnL2
        );

        let announcement = events.recv().await.unwrap();
        assert_eq!(announcement.kind, MessageKind::TransactionSuccess);
        let identity: TransactionIdentity = announcement.decode_data().unwrap();
        assert_eq!(identity.hash, "0xabc");
        assert_eq!(identity.account, AccountId::new("0x1", "mainnet"));
    }

    #[tokio::test]
    async fn settled_transaction_is_announced_exactly_once() {
        let provider = Arc::new(MockProvider::new());
        provider.set_status("0xabc", TransactionStatus::AcceptedOnL2, None);

        let (mut tracker, ui_bus) = tracker_with(provider);
        let mut events = ui_bus.subscribe();
        tracker.track(pending("0xabc"));

        assert_eq!(tracker.poll_once().await.len(), 1);
        // Remote state unchanged: the second round must be a no-op.
        assert!(tracker.poll_once().await.is_empty());

        assert_eq!(
            events.recv().await.unwrap().kind,
            MessageKind::TransactionSuccess
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(events.try_recv().is_none());
    }

    #[tokio::test]
    async fn rejected_transactions_are_not_announced() {
        let provider = Arc::new(MockProvider::new());
        provider.set_status("0xbad", TransactionStatus::Rejected, Some("reverted"));

        let (mut tracker, ui_bus) = tracker_with(provider);
        let mut events = ui_bus.subscribe();
        tracker.track(pending("0xbad"));

        let changed = tracker.poll_once().await;
        assert_eq!(changed.len(), 1);
        assert_eq!(
            tracker.transactions()[0].failure_reason.as_deref(),
            Some("reverted")
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(events.try_recv().is_none());
    }

    #[tokio::test]
    async fn tracking_is_deduplicated_by_identity() {
        let provider = Arc::new(MockProvider::new());
        let (mut tracker, _ui_bus) = tracker_with(provider);

        tracker.track(pending("0xabc"));
        tracker.track(pending("0xabc"));
        assert_eq!(tracker.transactions().len(), 1);
    }

    #[tokio::test]
    async fn remove_for_account_drops_only_that_account() {
        let provider = Arc::new(MockProvider::new());
        let (mut tracker, _ui_bus) = tracker_with(provider);

        tracker.track(pending("0xabc"));
        tracker.track(Transaction::new(
            "0xdef",
            AccountId::new("0x2", "mainnet"),
            TransactionStatus::Pending,
        ));

        tracker.remove_for_account(&AccountId::new("0x1", "mainnet"));
        assert_eq!(tracker.transactions().len(), 1);
        assert_eq!(tracker.transactions()[0].hash, "0xdef");
    }
}
