//! Chat entity - a private conversation or a group

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Chat kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ChatKind {
    /// One-to-one conversation, always exactly two participants
    #[default]
    Private = 0,
    /// Named conversation with one or more participants
    Group = 1,
}

impl ChatKind {
    /// Get the numeric value
    #[inline]
    #[must_use]
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl From<i16> for ChatKind {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::Group,
            _ => Self::Private,
        }
    }
}

impl From<ChatKind> for i16 {
    fn from(kind: ChatKind) -> Self {
        kind as i16
    }
}

/// Chat entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: Snowflake,
    pub kind: ChatKind,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub creator_id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl Chat {
    /// Create a new private chat
    #[must_use]
    pub fn new_private(id: Snowflake, creator_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind: ChatKind::Private,
            name: None,
            avatar: None,
            creator_id,
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Create a new group chat
    #[must_use]
    pub fn new_group(
        id: Snowflake,
        creator_id: Snowflake,
        name: String,
        avatar: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind: ChatKind::Group,
            name: Some(name),
            avatar,
            creator_id,
            created_at: now,
            last_activity_at: now,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_private(&self) -> bool {
        matches!(self.kind, ChatKind::Private)
    }

    #[inline]
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, ChatKind::Group)
    }

    #[inline]
    #[must_use]
    pub fn is_creator(&self, user_id: Snowflake) -> bool {
        self.creator_id == user_id
    }

    /// Get display name (chat name or fallback for private chats)
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Private chat")
    }
}
