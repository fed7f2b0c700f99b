//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chat_core::entities::{Chat, Message, Participant, ParticipantState, Reaction, ReadMarker, User};
use chat_core::{SearchHit, Snowflake};
use chrono::{DateTime, Utc};

use super::responses::{
    ChatResponse, MessageResponse, ParticipantResponse, ReactionResponse, ReadMarkerResponse,
    SearchResultResponse, UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

impl UserResponse {
    /// Placeholder for a user missing from the directory
    pub fn unknown(id: Snowflake) -> Self {
        Self {
            id: id.to_string(),
            username: String::from("unknown"),
            display_name: None,
            avatar: None,
        }
    }

    /// Look `id` up in `users`, falling back to a placeholder
    pub fn lookup(users: &[User], id: Snowflake) -> Self {
        users
            .iter()
            .find(|u| u.id == id)
            .map_or_else(|| Self::unknown(id), Self::from)
    }
}

// ============================================================================
// Chat Mappers
// ============================================================================

impl ChatResponse {
    /// Annotate `chat` with one participant's flags as observed at `now`
    pub fn new(chat: &Chat, state: &ParticipantState, now: DateTime<Utc>) -> Self {
        let state = state.effective(now);
        Self {
            id: chat.id.to_string(),
            kind: chat.kind,
            name: chat.name.clone(),
            avatar: chat.avatar.clone(),
            creator_id: chat.creator_id.to_string(),
            created_at: chat.created_at,
            last_activity_at: chat.last_activity_at,
            archived: state.archived,
            muted: state.muted,
            muted_until: state.muted_until,
            pinned: state.pinned,
        }
    }
}

impl ParticipantResponse {
    pub fn new(participant: &Participant, user: UserResponse) -> Self {
        Self {
            chat_id: participant.chat_id.to_string(),
            user,
            joined_at: participant.joined_at,
        }
    }
}

// ============================================================================
// Message Mappers
// ============================================================================

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            chat_id: message.chat_id.to_string(),
            sender_id: message.sender_id.to_string(),
            content: message.content.clone(),
            message_type: message.message_type,
            blob_ref: message.blob_ref.clone(),
            reply_to: message.reply_to.map(|id| id.to_string()),
            forwarded_from: message.forwarded_from.map(|id| id.to_string()),
            created_at: message.created_at,
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}

impl From<SearchHit> for SearchResultResponse {
    fn from(hit: SearchHit) -> Self {
        Self {
            message: MessageResponse::from(&hit.message),
            occurrences: hit.occurrences,
        }
    }
}

impl From<&ReadMarker> for ReadMarkerResponse {
    fn from(marker: &ReadMarker) -> Self {
        Self {
            message_id: marker.message_id.to_string(),
            user_id: marker.user_id.to_string(),
            read_at: marker.read_at,
        }
    }
}

// ============================================================================
// Reaction Mappers
// ============================================================================

impl ReactionResponse {
    pub fn new(reaction: &Reaction, user: UserResponse) -> Self {
        Self {
            id: reaction.id.to_string(),
            message_id: reaction.message_id.to_string(),
            emoji: reaction.emoji.clone(),
            user,
            created_at: reaction.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::MessageType;
    use chrono::Duration;

    #[test]
    fn test_chat_response_reports_elapsed_mute_as_unmuted() {
        let chat = Chat::new_private(Snowflake::new(1), Snowflake::new(2));
        let now = Utc::now();
        let state = ParticipantState {
            muted: true,
            muted_until: Some(now - Duration::minutes(1)),
            ..ParticipantState::default()
        };
        let response = ChatResponse::new(&chat, &state, now);
        assert!(!response.muted);
        assert!(response.muted_until.is_none());
    }

    #[test]
    fn test_message_response_ids_are_strings() {
        let message = Message::new(
            Snowflake::new(10),
            Snowflake::new(20),
            Snowflake::new(30),
            "hello".into(),
            MessageType::Text,
            None,
        )
        .in_reply_to(Some(Snowflake::new(5)));
        let response = MessageResponse::from(&message);
        assert_eq!(response.id, "10");
        assert_eq!(response.reply_to.as_deref(), Some("5"));
        assert!(response.forwarded_from.is_none());
    }

    #[test]
    fn test_user_lookup_falls_back_to_unknown() {
        let users = vec![User::new(Snowflake::new(1), "alice".into())];
        assert_eq!(UserResponse::lookup(&users, Snowflake::new(1)).username, "alice");
        assert_eq!(UserResponse::lookup(&users, Snowflake::new(2)).username, "unknown");
    }
}
