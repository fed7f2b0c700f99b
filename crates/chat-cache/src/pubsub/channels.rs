//! Pub/Sub channel definitions.
//!
//! One channel per chat carries every chat event.

use chat_core::Snowflake;

/// Channel prefix for chat events
pub const CHAT_CHANNEL_PREFIX: &str = "chat:";

/// Pub/Sub channel types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Events for a specific chat (all participants)
    Chat(Snowflake),
}

impl PubSubChannel {
    /// Create a chat channel
    #[must_use]
    pub fn chat(chat_id: Snowflake) -> Self {
        Self::Chat(chat_id)
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Chat(id) => format!("{CHAT_CHANNEL_PREFIX}{id}"),
        }
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
