//! User entity - a read-only view of the external user directory

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// User as seen by the chat engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: Snowflake, username: String) -> Self {
        Self {
            id,
            username,
            display_name: None,
            avatar: None,
            created_at: Utc::now(),
        }
    }

    /// Name shown next to messages: display name if set, username otherwise
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_prefers_display_name() {
        let mut user = User::new(Snowflake::new(1), "alice".to_string());
        assert_eq!(user.name(), "alice");

        user.display_name = Some("Alice L.".to_string());
        assert_eq!(user.name(), "Alice L.");
    }
}
