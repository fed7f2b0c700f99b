//! Request DTOs and commands
//!
//! Every command implements `Deserialize` and `Validate`. The HTTP layer
//! rejects malformed input early; services re-check the domain rules.

use chat_core::{ChatKind, DeleteScope, MessageType, OnlineStatus, ParticipantState, Snowflake};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Chat Requests
// ============================================================================

/// Create a private or group chat
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChatCommand {
    pub kind: ChatKind,

    /// Other members; the caller is always added
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 participants"))]
    pub participant_ids: Vec<Snowflake>,

    #[validate(length(min = 1, max = 100, message = "Chat name must be 1-100 characters"))]
    pub name: Option<String>,

    pub avatar: Option<String>,
}

/// Add users to a group chat
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddParticipantsCommand {
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 users"))]
    pub user_ids: Vec<Snowflake>,
}

/// Mute a chat, optionally until a point in time
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MuteChatCommand {
    /// `None` mutes indefinitely
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
}

/// Filter for `GET /chats`
///
/// Archived chats are hidden unless `archived=true` is requested.
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct ChatListFilter {
    pub archived: Option<bool>,
    pub muted: Option<bool>,
    pub pinned: Option<bool>,
}

impl ChatListFilter {
    /// Whether a chat with the caller's `state` belongs in the listing at `now`
    pub fn matches(&self, state: &ParticipantState, now: DateTime<Utc>) -> bool {
        let archived_ok = state.archived == self.archived.unwrap_or(false);
        let muted_ok = self
            .muted
            .map_or(true, |want| state.is_effectively_muted(now) == want);
        let pinned_ok = self.pinned.map_or(true, |want| state.pinned == want);
        archived_ok && muted_ok && pinned_ok
    }
}

/// Typing indicator request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TypingRequest {
    pub typing: bool,
}

/// Online status update
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: OnlineStatus,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Send a message, optionally as a reply
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SendMessageCommand {
    #[serde(default)]
    #[validate(length(max = 4000, message = "Content must be at most 4000 characters"))]
    pub content: String,

    #[serde(default)]
    pub message_type: MessageType,

    pub blob_ref: Option<String>,

    pub reply_to: Option<Snowflake>,
}

impl SendMessageCommand {
    /// Plain text message
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn replying_to(mut self, parent: Snowflake) -> Self {
        self.reply_to = Some(parent);
        self
    }
}

/// Forward one message into a chat
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForwardMessageCommand {
    pub chat_id: Snowflake,
}

/// Forward several messages into a chat, in order
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForwardBatchCommand {
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 messages"))]
    pub message_ids: Vec<Snowflake>,

    pub chat_id: Snowflake,
}

/// Delete scope, taken from the query string
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct DeleteMessageCommand {
    #[serde(default)]
    pub scope: DeleteScope,
}

/// Keyset page for message listings
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct ListMessagesQuery {
    /// Only messages older than this one
    pub before: Option<Snowflake>,

    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<i64>,
}

impl ListMessagesQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    /// Requested limit clamped to `1..=100`
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

// ============================================================================
// Reaction Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddReactionCommand {
    #[validate(length(min = 1, max = 32, message = "Emoji must be 1-32 characters"))]
    pub emoji: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReactionCommand {
    #[validate(length(min = 1, max = 32, message = "Emoji must be 1-32 characters"))]
    pub emoji: String,
}

// ============================================================================
// Search & Export Requests
// ============================================================================

/// Substring search over the caller's chats
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchMessagesCommand {
    pub q: String,

    pub chat_id: Option<Snowflake>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page starts at 1"))]
    pub page: i64,

    #[serde(default = "default_search_per_page")]
    #[validate(range(min = 1, max = 100, message = "per_page must be 1-100"))]
    pub per_page: i64,
}

impl SearchMessagesCommand {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            chat_id: None,
            page: default_page(),
            per_page: default_search_per_page(),
        }
    }
}

/// Transcript export window
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExportChatCommand {
    /// `json`, `csv` or `txt`
    #[serde(default = "default_export_format")]
    pub format: String,

    pub from: Option<DateTime<Utc>>,

    pub to: Option<DateTime<Utc>>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page starts at 1"))]
    pub page: i64,

    #[serde(default = "default_export_per_page")]
    #[validate(range(min = 1, message = "per_page must be positive"))]
    pub per_page: i64,
}

impl ExportChatCommand {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            from: None,
            to: None,
            page: default_page(),
            per_page: default_export_per_page(),
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_search_per_page() -> i64 {
    20
}

fn default_export_per_page() -> i64 {
    100
}

fn default_export_format() -> String {
    String::from("json")
}
