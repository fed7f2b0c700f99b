//! Read marker - records that a user has seen a message

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Read marker, unique per (message, user)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadMarker {
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub read_at: DateTime<Utc>,
}

impl ReadMarker {
    pub fn new(message_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            message_id,
            user_id,
            read_at: Utc::now(),
        }
    }
}
