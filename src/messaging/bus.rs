//! Message bus built on top of a channel endpoint
//!
//! The bus owns one end of a [`MessageChannel`](super::channel::MessageChannel)
//! and fans inbound messages out to any number of independent subscribers.
//! It offers three interaction styles:
//!
//! - [`MessageBus::send`]: fire-and-forget, never fails
//! - [`MessageBus::request`]: one-shot request/response with a generated
//!   correlation id and a response timeout
//! - [`MessageBus::subscribe`]: a multicast, replay-free stream of all
//!   inbound messages; dropping the stream cancels the subscription
//!
//! [`MessageBus::wait_for`] matches the first inbound message of a kind with
//! no timeout and no correlation filtering. Two concurrent waits on the same
//! kind can each grab the other's reply, and an unanswered wait stalls
//! forever. Prefer [`MessageBus::request`] for request/response exchanges.
//!
//! Control behaviors (such as the dev reload) are implemented as
//! subscribers, never inside the bus.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, warn};

use crate::errors::MessagingError;

use super::channel::{ChannelSender, MessageChannel};
use super::types::{MessageKind, WalletMessage};

/// Inbound messages buffered per subscriber before the slowest one lags
const MESSAGE_BUFFER: usize = 256;

/// Default window for [`MessageBus::request`] before `ResponseTimeout`
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Cross-context message bus
///
/// Cheap to clone; all clones share the same channel endpoint and
/// subscriber set. Construction spawns a pump task on the current runtime,
/// so a bus must be created inside an async context.
#[derive(Clone)]
pub struct MessageBus {
    sender: ChannelSender,
    inbound: broadcast::Sender<WalletMessage>,
    response_timeout: Duration,
}

impl MessageBus {
    /// Wrap a channel endpoint with the default response timeout
    pub fn new(channel: MessageChannel) -> Self {
        Self::with_response_timeout(channel, DEFAULT_RESPONSE_TIMEOUT)
    }

    /// Wrap a channel endpoint with an explicit response timeout
    pub fn with_response_timeout(channel: MessageChannel, response_timeout: Duration) -> Self {
        let (sender, mut receiver) = channel.split();
        let (inbound, _) = broadcast::channel(MESSAGE_BUFFER);

        let pump = inbound.clone();
        tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                // Err only means nobody is subscribed right now.
                let _ = pump.send(message);
            }
            debug!("message channel closed, bus pump exiting");
        });

        Self {
            sender,
            inbound,
            response_timeout,
        }
    }

    /// Enqueue a message for the peer context; returns immediately
    pub fn send(&self, message: WalletMessage) {
        self.sender.send(&message);
    }

    /// Subscribe to all inbound messages from this point on
    pub fn subscribe(&self) -> MessageStream {
        MessageStream {
            receiver: self.inbound.subscribe(),
        }
    }

    /// Wait for the first inbound message of `kind`
    ///
    /// Matching starts at the moment of the call; earlier messages are not
    /// replayed. No timeout applies and correlation ids are ignored.
    pub async fn wait_for(&self, kind: MessageKind) -> Result<WalletMessage, MessagingError> {
        let mut stream = self.subscribe();
        loop {
            match stream.recv().await {
                Some(message) if message.kind == kind => return Ok(message),
                Some(_) => continue,
                None => return Err(MessagingError::ChannelClosed),
            }
        }
    }

    /// Send a request and wait for its `_RES` counterpart
    ///
    /// A fresh correlation id is attached and the response is matched on
    /// both kind and id, so concurrent requests of the same kind resolve to
    /// the right caller. Fails with `ResponseTimeout` when no matching
    /// response arrives within the configured window.
    pub async fn request(
        &self,
        mut message: WalletMessage,
    ) -> Result<WalletMessage, MessagingError> {
        let response_kind = message
            .kind
            .response_kind()
            .ok_or_else(|| MessagingError::NoResponseKind(message.kind.to_string()))?;
        let correlation_id = rand::random::<u64>();
        message.correlation_id = Some(correlation_id);

        // Subscribe before sending so the response cannot slip past.
        let mut stream = self.subscribe();
        self.send(message);

        let wait = async {
            loop {
                match stream.recv().await {
                    Some(response)
                        if response.kind == response_kind
                            && response.correlation_id == Some(correlation_id) =>
                    {
                        return Ok(response)
                    }
                    Some(_) => continue,
                    None => return Err(MessagingError::ChannelClosed),
                }
            }
        };

        tokio::time::timeout(self.response_timeout, wait)
            .await
            .map_err(|_| MessagingError::ResponseTimeout {
                kind: response_kind.to_string(),
                timeout_ms: self.response_timeout.as_millis() as u64,
            })?
    }
}

/// One subscription to a bus's inbound messages
///
/// Replay-free: only messages arriving after [`MessageBus::subscribe`] are
/// observed, in arrival order. Dropping the stream cancels the
/// subscription and releases its buffer.
pub struct MessageStream {
    receiver: broadcast::Receiver<WalletMessage>,
}

impl MessageStream {
    /// Next inbound message, or `None` once the bus is gone
    ///
    /// A subscriber that falls a full buffer behind skips the overwritten
    /// messages rather than blocking the bus.
    pub async fn recv(&mut self) -> Option<WalletMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "slow subscriber skipped inbound messages");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv)
    ///
    /// Returns `None` when no message is currently queued.
    pub fn try_recv(&mut self) -> Option<WalletMessage> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => return Some(message),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "slow subscriber skipped inbound messages");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
