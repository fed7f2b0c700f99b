//! Reaction and read marker database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub id: i64,
    pub message_id: i64,
    pub user_id: i64,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

/// Database model for read_markers table
#[derive(Debug, Clone, FromRow)]
pub struct ReadMarkerModel {
    pub message_id: i64,
    pub user_id: i64,
    pub read_at: DateTime<Utc>,
}
