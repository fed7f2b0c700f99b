//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Chat not found: {0}")]
    ChatNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("Reaction not found: {0}")]
    ReactionNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message content must not be blank")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Search query must be at least {min} characters")]
    QueryTooShort { min: usize },

    #[error("Emoji is not allowed: {0}")]
    EmojiNotAllowed(String),

    #[error("Reply target is not a visible message in this chat")]
    InvalidReplyTarget,

    #[error("Mute must last at least {min_minutes} minutes")]
    MuteUntilTooSoon { min_minutes: i64 },

    #[error("Mute cannot last more than {max_days} days")]
    MuteUntilTooFar { max_days: i64 },

    #[error("Maximum pinned chats reached ({max})")]
    PinLimitReached { max: usize },

    #[error("Unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    #[error("Invalid participants: {0}")]
    InvalidParticipants(String),

    #[error("Participants of a private chat cannot change")]
    PrivateChatMembershipFixed,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not a participant of this chat")]
    NotParticipant,

    #[error("Not message sender")]
    NotMessageSender,

    #[error("Not reaction owner")]
    NotReactionOwner,

    #[error("Not chat creator")]
    NotChatCreator,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Reaction already exists")]
    ReactionAlreadyExists,

    #[error("Message already marked as read")]
    ReadMarkerExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ChatNotFound(_) => "UNKNOWN_CHAT",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::ReactionNotFound(_) => "UNKNOWN_REACTION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::QueryTooShort { .. } => "QUERY_TOO_SHORT",
            Self::EmojiNotAllowed(_) => "EMOJI_NOT_ALLOWED",
            Self::InvalidReplyTarget => "INVALID_REPLY_TARGET",
            Self::MuteUntilTooSoon { .. } => "MUTE_UNTIL_TOO_SOON",
            Self::MuteUntilTooFar { .. } => "MUTE_UNTIL_TOO_FAR",
            Self::PinLimitReached { .. } => "PIN_LIMIT_REACHED",
            Self::UnsupportedExportFormat(_) => "UNSUPPORTED_EXPORT_FORMAT",
            Self::InvalidParticipants(_) => "INVALID_PARTICIPANTS",
            Self::PrivateChatMembershipFixed => "PRIVATE_CHAT_MEMBERSHIP_FIXED",

            // Authorization
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::NotMessageSender => "NOT_MESSAGE_SENDER",
            Self::NotReactionOwner => "NOT_REACTION_OWNER",
            Self::NotChatCreator => "NOT_CHAT_CREATOR",

            // Conflict
            Self::ReactionAlreadyExists => "REACTION_ALREADY_EXISTS",
            Self::ReadMarkerExists => "READ_MARKER_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ChatNotFound(_)
                | Self::MessageNotFound(_)
                | Self::ReactionNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyContent
                | Self::ContentTooLong { .. }
                | Self::QueryTooShort { .. }
                | Self::EmojiNotAllowed(_)
                | Self::InvalidReplyTarget
                | Self::MuteUntilTooSoon { .. }
                | Self::MuteUntilTooFar { .. }
                | Self::PinLimitReached { .. }
                | Self::UnsupportedExportFormat(_)
                | Self::InvalidParticipants(_)
                | Self::PrivateChatMembershipFixed
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotParticipant
                | Self::NotMessageSender
                | Self::NotReactionOwner
                | Self::NotChatCreator
        )
    }

    /// Check if this is a conflict error
    ///
    /// Conflicts come from storage uniqueness constraints and are reported
    /// to clients the same way as validation failures.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ReactionAlreadyExists | Self::ReadMarkerExists)
    }
}
