//! Dev-only reload observer
//!
//! During development an external watcher pushes a `RELOAD` marker through
//! the channel when the source tree changes. Reacting to it is a plain bus
//! subscription; the bus itself knows nothing about reloads, and release
//! builds simply never start this watcher.

use tracing::debug;

use crate::messaging::{MessageBus, MessageKind};

/// Subscriber invoking a reload callback on `RELOAD` markers
pub struct ReloadWatcher {
    bus: MessageBus,
}

impl ReloadWatcher {
    pub fn new(bus: MessageBus) -> Self {
        Self { bus }
    }

    /// Invoke `on_reload` for every reload marker until the bus closes
    pub async fn run<F>(self, mut on_reload: F)
    where
        F: FnMut() + Send,
    {
        let Self { bus } = self;
        let mut stream = bus.subscribe();
        // Holding the bus would keep our own subscription open past the
        // channel's death; the stream alone decides when we exit.
        drop(bus);
        while let Some(message) = stream.recv().await {
            if message.kind == MessageKind::Reload {
                debug!("reload marker received, reloading context");
                on_reload();
            }
        }
    }
}
