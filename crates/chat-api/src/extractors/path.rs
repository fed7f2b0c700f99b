//! Path parameter extractors
//!
//! Type-safe extraction of Snowflake IDs from path parameters.

use chat_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// Path parameters with chat_id
#[derive(Debug, Deserialize)]
pub struct ChatIdPath {
    pub chat_id: String,
}

impl ChatIdPath {
    /// Parse chat_id as Snowflake
    pub fn chat_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.chat_id, "chat_id")
    }
}

/// Path parameters with message_id
#[derive(Debug, Deserialize)]
pub struct MessageIdPath {
    pub message_id: String,
}

impl MessageIdPath {
    /// Parse message_id as Snowflake
    pub fn message_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.message_id, "message_id")
    }
}

/// Path parameters with reaction_id
#[derive(Debug, Deserialize)]
pub struct ReactionIdPath {
    pub reaction_id: String,
}

impl ReactionIdPath {
    pub fn reaction_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.reaction_id, "reaction_id")
    }
}

/// Path parameters with chat_id and user_id
#[derive(Debug, Deserialize)]
pub struct ParticipantPath {
    pub chat_id: String,
    pub user_id: String,
}

impl ParticipantPath {
    pub fn chat_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.chat_id, "chat_id")
    }

    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.user_id, "user_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_id() {
        let path = ChatIdPath {
            chat_id: "175928847299117063".to_string(),
        };
        assert_eq!(path.chat_id().unwrap().to_string(), "175928847299117063");
    }

    #[test]
    fn test_parse_invalid_id() {
        let path = ParticipantPath {
            chat_id: "1".to_string(),
            user_id: "bob".to_string(),
        };
        assert!(path.chat_id().is_ok());
        let err = path.user_id().unwrap_err();
        assert_eq!(err.to_string(), "Invalid path parameter: Invalid user_id format");
    }
}
