//! Event bus that keeps published envelopes in memory.
//!
//! Used for single-process deployments without Redis and by tests that
//! assert on what was broadcast.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chat_core::{EventBus, EventBusError, EventEnvelope};
use parking_lot::Mutex;

/// Records every published envelope in order
#[derive(Debug, Default)]
pub struct InMemoryEventBus {
    published: Mutex<Vec<EventEnvelope>>,
    failing: AtomicBool,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus whose every publish fails with a transport error
    #[must_use]
    pub fn failing() -> Self {
        let bus = Self::default();
        bus.set_failing(true);
        bus
    }

    /// Toggle transport failures on or off
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of everything published so far
    #[must_use]
    pub fn published(&self) -> Vec<EventEnvelope> {
        self.published.lock().clone()
    }

    /// Published envelopes whose event has the given wire name
    #[must_use]
    pub fn of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published
            .lock()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.published.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.published.lock().is_empty()
    }

    pub fn clear(&self) {
        self.published.lock().clear();
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, envelope: &EventEnvelope) -> Result<(), EventBusError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventBusError::Transport("in-memory bus is failing".to_string()));
        }

        tracing::trace!(
            chat_id = %envelope.chat_id,
            event_type = envelope.event_type(),
            recipients = envelope.recipients.len(),
            "Recorded event"
        );
        self.published.lock().push(envelope.clone());
        Ok(())
    }
}
