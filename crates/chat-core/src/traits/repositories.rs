//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Chat, Message, Participant, Reaction, ReadMarker, User};
use crate::error::DomainError;
use crate::value_objects::{SearchTerm, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

/// Read access to the external user directory
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find all users with the given IDs (missing ids are skipped)
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Insert a user record (directory sync and test seeding)
    async fn create(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Chat Repository
// ============================================================================

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Find chat by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>>;

    /// Find the private chat shared by two users, if any
    async fn find_private_between(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Chat>>;

    /// All chats a user participates in, paired with that user's own participant row
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<(Chat, Participant)>>;

    /// Create a chat together with its initial participants, atomically
    async fn create(&self, chat: &Chat, participant_ids: &[Snowflake]) -> RepoResult<()>;

    /// Record activity (a new message) on a chat
    async fn touch(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()>;
}

// ============================================================================
// Participant Repository
// ============================================================================

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Check if user is a participant of chat
    async fn is_participant(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Find a single participant row
    async fn find(&self, chat_id: Snowflake, user_id: Snowflake)
        -> RepoResult<Option<Participant>>;

    /// List participants of a chat, oldest membership first
    async fn find_by_chat(&self, chat_id: Snowflake) -> RepoResult<Vec<Participant>>;

    /// User IDs of all participants of a chat
    async fn participant_ids(&self, chat_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Add users to a chat; returns only the rows that were newly inserted
    async fn add(&self, chat_id: Snowflake, user_ids: &[Snowflake]) -> RepoResult<Vec<Participant>>;

    /// Remove a user from a chat; returns whether a row was deleted
    async fn remove(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Set the archived flag; `None` when the user is not a participant
    async fn set_archived(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        archived: bool,
    ) -> RepoResult<Option<Participant>>;

    /// Set the muted flag and its end; `None` when the user is not a participant
    async fn set_muted(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        muted: bool,
        until: Option<DateTime<Utc>>,
    ) -> RepoResult<Option<Participant>>;

    /// Set the pinned flag
    ///
    /// Pinning fails with `PinLimitReached` when the user already has
    /// `max_pinned` other pinned chats; the check and the write are atomic.
    async fn set_pinned(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        pinned: bool,
        max_pinned: usize,
    ) -> RepoResult<Option<Participant>>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Keyset pagination for message listings, newest first
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    /// Return messages strictly older than this message in `(created_at, id)` order
    pub before: Option<Snowflake>,
    pub limit: i64,
}

/// Date-bounded, offset-paginated transcript window, oldest first
#[derive(Debug, Clone, Default)]
pub struct TranscriptQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub offset: i64,
    pub limit: i64,
}

/// Substring search over the chats a viewer can read
#[derive(Debug, Clone)]
pub struct MessageSearch<'a> {
    pub viewer: Snowflake,
    pub term: &'a SearchTerm,
    pub chat_id: Option<Snowflake>,
    pub offset: i64,
    pub limit: i64,
}

/// A search result with its ranking score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub message: Message,
    pub occurrences: i64,
}

/// Messages are "visible" to a viewer when they are not deleted for all and
/// the viewer has not hidden them for themselves.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID regardless of deletion flags
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// Create a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Visible messages of a chat, newest first by `(created_at, id)`
    async fn find_visible(
        &self,
        chat_id: Snowflake,
        viewer: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>>;

    /// Visible direct replies to a message, oldest first
    async fn find_replies(&self, parent_id: Snowflake, viewer: Snowflake)
        -> RepoResult<Vec<Message>>;

    /// Visible messages of a chat inside a date window, oldest first
    async fn find_transcript(
        &self,
        chat_id: Snowflake,
        viewer: Snowflake,
        query: TranscriptQuery,
    ) -> RepoResult<Vec<Message>>;

    /// Whether the viewer has hidden this message for themselves
    async fn is_hidden_for(&self, message_id: Snowflake, viewer: Snowflake) -> RepoResult<bool>;

    /// Hide a message for its sender only (idempotent)
    async fn delete_for_sender(&self, message_id: Snowflake, sender_id: Snowflake)
        -> RepoResult<()>;

    /// Hide a message for everyone (idempotent)
    async fn delete_for_all(&self, message_id: Snowflake) -> RepoResult<()>;

    /// Ranked search: occurrence count desc, then `(created_at, id)` desc
    async fn search(&self, search: MessageSearch<'_>) -> RepoResult<Vec<SearchHit>>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find reaction by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reaction>>;

    /// Get all reactions for a message
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Reaction>>;

    /// Add a reaction; `ReactionAlreadyExists` if the triple is taken
    async fn create(&self, reaction: &Reaction) -> RepoResult<()>;

    /// Change the emoji of a reaction; `ReactionAlreadyExists` if the new triple is taken
    async fn update_emoji(&self, id: Snowflake, emoji: &str) -> RepoResult<Option<Reaction>>;

    /// Remove a reaction; returns whether a row was deleted
    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Read Marker Repository
// ============================================================================

#[async_trait]
pub trait ReadMarkerRepository: Send + Sync {
    async fn find(&self, message_id: Snowflake, user_id: Snowflake)
        -> RepoResult<Option<ReadMarker>>;

    /// Record a read; `ReadMarkerExists` if the pair is taken
    async fn create(&self, marker: &ReadMarker) -> RepoResult<()>;

    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<ReadMarker>>;
}
