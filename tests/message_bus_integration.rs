//! Integration tests for cross-context messaging
//!
//! Both ends of every exchange here are real buses over an in-process
//! duplex channel, so delivery, ordering, and correlation behave exactly as
//! they do between live execution contexts.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use extension_wallet_core::messaging::{MessageBus, MessageChannel, MessageKind, WalletMessage};
use extension_wallet_core::services::{
    BackgroundClient, BackgroundCommands, BackgroundHandler, ReloadWatcher,
};

#[derive(Clone, Default)]
struct RecordingCommands {
    removed_hosts: Arc<Mutex<Vec<String>>>,
    preauth_resets: Arc<Mutex<u32>>,
}

#[async_trait]
impl BackgroundCommands for RecordingCommands {
    async fn messaging_public_key(&self) -> String {
        "0x04deadbeef".to_string()
    }

    async fn remove_preauthorization(&self, host: &str) {
        self.removed_hosts.lock().unwrap().push(host.to_string());
    }

    async fn reset_preauthorizations(&self) {
        *self.preauth_resets.lock().unwrap() += 1;
    }

    async fn reset_all(&self) {}
}

#[tokio::test]
async fn ui_commands_round_trip_to_the_background() {
    let (ui_end, background_end) = MessageChannel::duplex();
    let ui_bus = MessageBus::new(ui_end);
    let background_bus = MessageBus::new(background_end);

    let commands = RecordingCommands::default();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(BackgroundHandler::new(background_bus, commands.clone()).run(shutdown_rx));
    // Let the handler subscribe before any command is sent.
    tokio::time::sleep(Duration::from_millis(10)).await;

    let client = BackgroundClient::new(ui_bus);

    let key = client.get_messaging_public_key().await.unwrap();
    assert_eq!(key, "0x04deadbeef");

    client.remove_preauthorization("https://a.example").await.unwrap();
    client.remove_preauthorization("https://b.example").await.unwrap();
    assert_eq!(
        commands.removed_hosts.lock().unwrap().as_slice(),
        ["https://a.example", "https://b.example"]
    );
}

#[tokio::test]
async fn concurrent_same_kind_requests_each_get_their_own_reply() {
    let (ui_end, background_end) = MessageChannel::duplex();
    let ui_bus = MessageBus::new(ui_end);
    let background_bus = MessageBus::new(background_end);

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(
        BackgroundHandler::new(background_bus, RecordingCommands::default()).run(shutdown_rx),
    );
    tokio::time::sleep(Duration::from_millis(10)).await;

    let client = BackgroundClient::new(ui_bus);
    let (first, second, third) = tokio::join!(
        client.get_messaging_public_key(),
        client.get_messaging_public_key(),
        client.get_messaging_public_key(),
    );
    assert_eq!(first.unwrap(), "0x04deadbeef");
    assert_eq!(second.unwrap(), "0x04deadbeef");
    assert_eq!(third.unwrap(), "0x04deadbeef");
}

#[tokio::test]
async fn broadcasts_interleave_with_request_traffic_in_order() {
    let (ui_end, background_end) = MessageChannel::duplex();
    let ui_bus = MessageBus::new(ui_end);
    let background_bus = MessageBus::new(background_end);

    let mut stream = ui_bus.subscribe();
    for i in 0..20_u64 {
        background_bus.send(WalletMessage::with_data(
            MessageKind::TransactionSuccess,
            serde_json::json!({ "sequence": i }),
        ));
    }

    for expected in 0..20_u64 {
        let message = stream.recv().await.unwrap();
        assert_eq!(message.data.unwrap()["sequence"], expected);
    }
}

#[tokio::test]
async fn reload_watcher_coexists_with_other_subscribers() {
    let (dev_end, context_end) = MessageChannel::duplex();
    let dev_bus = MessageBus::new(dev_end);
    let context_bus = MessageBus::new(context_end);

    let reloads = Arc::new(AtomicU32::new(0));
    let counter = reloads.clone();
    tokio::spawn(ReloadWatcher::new(context_bus.clone()).run(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let mut other = context_bus.subscribe();
    tokio::time::sleep(Duration::from_millis(10)).await;

    dev_bus.send(WalletMessage::new(MessageKind::Reload));
    dev_bus.send(WalletMessage::new(MessageKind::TransactionSuccess));

    // The non-reload subscriber still sees everything, reload included.
    assert_eq!(other.recv().await.unwrap().kind, MessageKind::Reload);
    assert_eq!(
        other.recv().await.unwrap().kind,
        MessageKind::TransactionSuccess
    );

    for _ in 0..50 {
        if reloads.load(Ordering::SeqCst) == 1 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("reload watcher never fired");
}

#[tokio::test]
async fn request_to_an_absent_background_times_out() {
    let (ui_end, background_end) = MessageChannel::duplex();
    let ui_bus = MessageBus::with_response_timeout(ui_end, Duration::from_millis(50));
    // The background context exists but answers nothing.
    let _background_bus = MessageBus::new(background_end);

    let client = BackgroundClient::new(ui_bus);
    assert!(client.get_messaging_public_key().await.is_err());
}
