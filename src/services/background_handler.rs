//! Background-side command loop
//!
//! Subscribes to the background bus and routes inbound commands to an
//! injected [`BackgroundCommands`] implementation, replying with the `_RES`
//! counterpart (correlation id echoed) where the vocabulary defines one.

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::messaging::{MessageBus, MessageKind, WalletMessage};

/// Background-context operations invocable from other contexts
#[async_trait]
pub trait BackgroundCommands: Send + Sync {
    /// The public key the UI uses to encrypt sensitive payloads
    async fn messaging_public_key(&self) -> String;

    /// Revoke one host's pre-authorization
    async fn remove_preauthorization(&self, host: &str);

    /// Revoke every pre-authorization
    async fn reset_preauthorizations(&self);

    /// Wipe all wallet state
    async fn reset_all(&self);
}

/// Service loop answering UI commands on the background bus
pub struct BackgroundHandler<C> {
    bus: MessageBus,
    commands: C,
}

impl<C: BackgroundCommands> BackgroundHandler<C> {
    pub fn new(bus: MessageBus, commands: C) -> Self {
        Self { bus, commands }
    }

    /// Handle inbound commands until the bus closes or `shutdown` flips
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut stream = self.bus.subscribe();
        loop {
            tokio::select! {
                message = stream.recv() => {
                    match message {
                        Some(message) => self.handle(message).await,
                        None => {
                            info!("message bus closed, background handler exiting");
                            return;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("background handler shutting down");
                        return;
                    }
                }
            }
        }
    }

    async fn handle(&self, message: WalletMessage) {
        match message.kind {
            MessageKind::GetMessagingPublicKey => {
                let key = self.commands.messaging_public_key().await;
                if let Some(reply) = WalletMessage::response_to(&message, Some(json!(key))) {
                    self.bus.send(reply);
                }
            }
            MessageKind::RemovePreauthorization => {
                let host: String = message.decode_data().unwrap_or_default();
                self.commands.remove_preauthorization(&host).await;
                if let Some(reply) = WalletMessage::response_to(&message, None) {
                    self.bus.send(reply);
                }
            }
            MessageKind::ResetPreauthorizations => {
                self.commands.reset_preauthorizations().await;
            }
            MessageKind::ResetAll => {
                self.commands.reset_all().await;
            }
            other => {
                debug!(kind = %other, "ignoring non-command message");
            }
        }
    }
}
