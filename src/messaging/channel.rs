//! Bidirectional serialized transport between execution contexts
//!
//! Execution contexts share no memory, so everything that crosses a channel
//! is a serialized frame. Delivery is best-effort and at-most-once: sending
//! into a closed or not-yet-open endpoint silently drops the frame.
//! Frames from one sender arrive in send order; nothing is guaranteed
//! across different senders.

use tokio::sync::mpsc;
use tracing::warn;

use super::types::WalletMessage;

/// One endpoint of a bidirectional message channel
pub struct MessageChannel {
    sender: ChannelSender,
    receiver: ChannelReceiver,
}

impl MessageChannel {
    /// Build a connected pair of endpoints
    ///
    /// In production each end lives in a different execution context; in
    /// tests both ends stay in-process, which makes cross-context delivery
    /// deterministic.
    pub fn duplex() -> (MessageChannel, MessageChannel) {
        let (left_tx, left_rx) = mpsc::unbounded_channel();
        let (right_tx, right_rx) = mpsc::unbounded_channel();
        (
            MessageChannel {
                sender: ChannelSender { outbound: left_tx },
                receiver: ChannelReceiver { inbound: right_rx },
            },
            MessageChannel {
                sender: ChannelSender { outbound: right_tx },
                receiver: ChannelReceiver { inbound: left_rx },
            },
        )
    }

    /// Split into independently owned send and receive halves
    pub fn split(self) -> (ChannelSender, ChannelReceiver) {
        (self.sender, self.receiver)
    }

    pub fn send(&self, message: &WalletMessage) {
        self.sender.send(message);
    }

    pub async fn recv(&mut self) -> Option<WalletMessage> {
        self.receiver.recv().await
    }
}

/// Sending half of a channel endpoint
#[derive(Clone)]
pub struct ChannelSender {
    outbound: mpsc::UnboundedSender<String>,
}

impl ChannelSender {
    /// Serialize and enqueue a message; never fails
    ///
    /// A peer that has gone away just means the frame is dropped.
    pub fn send(&self, message: &WalletMessage) {
        if let Ok(frame) = serde_json::to_string(message) {
            let _ = self.outbound.send(frame);
        }
    }
}

/// Receiving half of a channel endpoint
pub struct ChannelReceiver {
    inbound: mpsc::UnboundedReceiver<String>,
}

impl ChannelReceiver {
    /// Next inbound message, or `None` once the peer is gone
    ///
    /// Frames that fail to decode are dropped: an undecodable frame can only
    /// come from a build mismatch, and stalling the whole channel over it
    /// would take down messages that are still well-formed.
    pub async fn recv(&mut self) -> Option<WalletMessage> {
        loop {
            let frame = self.inbound.recv().await?;
            match serde_json::from_str(&frame) {
                Ok(message) => return Some(message),
                Err(error) => {
                    warn!(%error, "dropping undecodable inbound frame");
                }
            }
        }
    }
}
