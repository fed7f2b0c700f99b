//! Message entity - represents a chat message

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Maximum length of message content in characters
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Kind of message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum MessageType {
    #[default]
    Text = 0,
    Image = 1,
    File = 2,
    Audio = 3,
    Video = 4,
}

impl MessageType {
    #[inline]
    #[must_use]
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Lowercase name used in exports and logs
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl From<i16> for MessageType {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::Image,
            2 => Self::File,
            3 => Self::Audio,
            4 => Self::Video,
            _ => Self::Text,
        }
    }
}

/// Scope of a message deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeleteScope {
    /// Hide the message from the sender's own view only
    #[default]
    ForSender,
    /// Hide the message from every participant
    ForAll,
}

/// Message entity
///
/// Content is immutable after creation. The two deletion flags only ever
/// move from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub chat_id: Snowflake,
    pub sender_id: Snowflake,
    pub content: String,
    pub message_type: MessageType,
    pub blob_ref: Option<String>,
    pub reply_to: Option<Snowflake>,
    pub forwarded_from: Option<Snowflake>,
    pub deleted_for_sender: bool,
    pub deleted_for_all: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new active message
    pub fn new(
        id: Snowflake,
        chat_id: Snowflake,
        sender_id: Snowflake,
        content: String,
        message_type: MessageType,
        blob_ref: Option<String>,
    ) -> Self {
        Self {
            id,
            chat_id,
            sender_id,
            content,
            message_type,
            blob_ref,
            reply_to: None,
            forwarded_from: None,
            deleted_for_sender: false,
            deleted_for_all: false,
            created_at: Utc::now(),
        }
    }

    /// Mark this message as a reply to `parent`
    #[must_use]
    pub fn in_reply_to(mut self, parent: Option<Snowflake>) -> Self {
        self.reply_to = parent;
        self
    }

    /// Create a copy of `original` in `chat_id`, owned by `sender_id`
    pub fn forward_of(
        original: &Message,
        id: Snowflake,
        chat_id: Snowflake,
        sender_id: Snowflake,
    ) -> Self {
        let mut message = Self::new(
            id,
            chat_id,
            sender_id,
            original.content.clone(),
            original.message_type,
            original.blob_ref.clone(),
        );
        message.forwarded_from = Some(original.id);
        message
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.message_type, MessageType::Text)
    }

    #[inline]
    pub fn is_reply(&self) -> bool {
        self.reply_to.is_some()
    }

    #[inline]
    pub fn is_forwarded(&self) -> bool {
        self.forwarded_from.is_some()
    }

    #[inline]
    pub fn is_sent_by(&self, user_id: Snowflake) -> bool {
        self.sender_id == user_id
    }

    /// Get a truncated preview of the message (for notifications)
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.content[..end]
        }
    }

    /// Check if message content is blank
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
