//! Message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub message_type: i16,
    pub blob_ref: Option<String>,
    pub reply_to: Option<i64>,
    pub forwarded_from: Option<i64>,
    pub deleted_for_sender: bool,
    pub deleted_for_all: bool,
    pub created_at: DateTime<Utc>,
}

/// A message row ranked by how often the search term occurs in it
#[derive(Debug, Clone, FromRow)]
pub struct SearchHitModel {
    #[sqlx(flatten)]
    pub message: MessageModel,
    pub occurrences: i64,
}
