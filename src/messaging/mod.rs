//! Cross-context messaging
//!
//! The wallet's three execution contexts (background worker, UI, injected
//! page script) share no memory; every piece of coordination crosses a
//! serialized [`MessageChannel`]. The [`MessageBus`] layers fan-out,
//! request/response, and subscriptions on top of one channel endpoint.
//!
//! # Ordering
//!
//! Messages from one context arrive at the peer in send order, and every
//! subscriber on the receiving bus observes them in arrival order. Nothing
//! is guaranteed across different sender contexts.
//!
//! # Example
//!
//! ```rust,no_run
//! use extension_wallet_core::messaging::{MessageBus, MessageChannel, MessageKind, WalletMessage};
//!
//! # async fn example() {
//! let (ui_end, background_end) = MessageChannel::duplex();
//! let ui = MessageBus::new(ui_end);
//! let background = MessageBus::new(background_end);
//!
//! let mut events = ui.subscribe();
//! background.send(WalletMessage::new(MessageKind::TransactionSuccess));
//! assert_eq!(events.recv().await.unwrap().kind, MessageKind::TransactionSuccess);
//! # }
//! ```

pub mod bus;
pub mod channel;
pub mod types;

pub use bus::{MessageBus, MessageStream, DEFAULT_RESPONSE_TIMEOUT};
pub use channel::{ChannelReceiver, ChannelSender, MessageChannel};
pub use types::{MessageKind, WalletMessage};
