//! Shopper notifications.
//!
//! Every user-visible checkout outcome goes through a sink; rendering (toast,
//! banner, log line) is the sink's business.

use std::sync::Mutex;

use mockall::automock;
use tracing::info;

/// Receives user-facing messages.
#[automock]
pub trait NotificationSink: Send + Sync {
    /// Delivers one message to the shopper.
    fn notify(&self, message: &str);
}

/// Emits notifications as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str) {
        info!(target: "vitrina::notify", "{message}");
    }
}

/// Buffers notifications for inspection, mainly in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of delivered messages, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, message: &str) {
        let mut guard = match self.messages.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        guard.push(message.to_string());
    }
}
