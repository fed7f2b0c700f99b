//! Reaction entity - represents an emoji reaction on a message

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Reaction entity
///
/// Unique per (message, user, emoji); a user may hold several reactions on
/// one message as long as the emoji differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: Snowflake,
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(id: Snowflake, message_id: Snowflake, user_id: Snowflake, emoji: String) -> Self {
        Self {
            id,
            message_id,
            user_id,
            emoji,
            created_at: Utc::now(),
        }
    }

    /// Check if reaction uses a specific emoji
    #[inline]
    pub fn is_emoji(&self, emoji: &str) -> bool {
        self.emoji == emoji
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: Snowflake) -> bool {
        self.user_id == user_id
    }
}
