//! UI-side wrappers for background-context commands

use serde_json::json;

use crate::errors::MessagingError;
use crate::messaging::{MessageBus, MessageKind, WalletMessage};

/// Typed facade over the commands the UI context sends the background
#[derive(Clone)]
pub struct BackgroundClient {
    bus: MessageBus,
}

impl BackgroundClient {
    pub fn new(bus: MessageBus) -> Self {
        Self { bus }
    }

    /// Fetch the background context's messaging public key
    pub async fn get_messaging_public_key(&self) -> Result<String, MessagingError> {
        let response = self
            .bus
            .request(WalletMessage::new(MessageKind::GetMessagingPublicKey))
            .await?;
        response
            .decode_data()
            .ok_or(MessagingError::MalformedResponse)
    }

    /// Wipe all wallet state; no response is awaited
    pub fn reset_all(&self) {
        self.bus.send(WalletMessage::new(MessageKind::ResetAll));
    }

    /// Revoke one host's pre-authorization and wait for the ack
    pub async fn remove_preauthorization(&self, host: &str) -> Result<(), MessagingError> {
        self.bus
            .request(WalletMessage::with_data(
                MessageKind::RemovePreauthorization,
                json!(host),
            ))
            .await?;
        Ok(())
    }

    /// Revoke every pre-authorization; no response is awaited
    pub fn reset_preauthorizations(&self) {
        self.bus
            .send(WalletMessage::new(MessageKind::ResetPreauthorizations));
    }
}
