//! Chat and participant database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for chats table
#[derive(Debug, Clone, FromRow)]
pub struct ChatModel {
    pub id: i64,
    pub kind: i16,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

/// Database model for chat_participants table
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantModel {
    pub chat_id: i64,
    pub user_id: i64,
    pub joined_at: DateTime<Utc>,
    pub archived: bool,
    pub muted: bool,
    pub muted_until: Option<DateTime<Utc>>,
    pub pinned: bool,
}

/// A chat joined with one user's participant row (chat list query)
#[derive(Debug, Clone, FromRow)]
pub struct ChatWithStateModel {
    #[sqlx(flatten)]
    pub chat: ChatModel,
    pub user_id: i64,
    pub joined_at: DateTime<Utc>,
    pub archived: bool,
    pub muted: bool,
    pub muted_until: Option<DateTime<Utc>>,
    pub pinned: bool,
}
