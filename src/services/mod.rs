//! Context-facing services built on the message bus
//!
//! Everything here is a plain bus client or subscriber: the UI-side command
//! wrappers, the background-side command loop answering them, and the
//! dev-only reload observer. None of these reach into another context's
//! state directly: commands and answers cross the bus as messages.

pub mod background_client;
pub mod background_handler;
pub mod reload;

pub use background_client::BackgroundClient;
pub use background_handler::{BackgroundCommands, BackgroundHandler};
pub use reload::ReloadWatcher;
