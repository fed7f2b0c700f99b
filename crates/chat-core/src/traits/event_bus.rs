//! Event bus port - the message-passing sink behind the broadcaster

use async_trait::async_trait;
use thiserror::Error;

use crate::events::EventEnvelope;

#[derive(Debug, Error)]
pub enum EventBusError {
    #[error("Event serialization failed: {0}")]
    Serialization(String),

    #[error("Event transport failed: {0}")]
    Transport(String),
}

/// Delivers envelopes to whatever transport fans them out to clients
///
/// Implementations must not assume delivery happened when `publish` returns;
/// they only hand the envelope over.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, envelope: &EventEnvelope) -> Result<(), EventBusError>;
}
