//! Chat and participant entity <-> model mapper

use chat_core::entities::{Chat, ChatKind, Participant, ParticipantState};
use chat_core::value_objects::Snowflake;

use crate::models::{ChatModel, ChatWithStateModel, ParticipantModel};

/// Convert ChatModel to Chat entity
impl From<ChatModel> for Chat {
    fn from(model: ChatModel) -> Self {
        Chat {
            id: Snowflake::new(model.id),
            kind: ChatKind::from(model.kind),
            name: model.name,
            avatar: model.avatar,
            creator_id: Snowflake::new(model.creator_id),
            created_at: model.created_at,
            last_activity_at: model.last_activity_at,
        }
    }
}

/// Convert ParticipantModel to Participant entity (stored flags, no expiry applied)
impl From<ParticipantModel> for Participant {
    fn from(model: ParticipantModel) -> Self {
        Participant {
            chat_id: Snowflake::new(model.chat_id),
            user_id: Snowflake::new(model.user_id),
            joined_at: model.joined_at,
            state: ParticipantState {
                archived: model.archived,
                muted: model.muted,
                muted_until: model.muted_until,
                pinned: model.pinned,
            },
        }
    }
}

/// Split a chat-list row into the chat and the viewer's participant row
impl From<ChatWithStateModel> for (Chat, Participant) {
    fn from(model: ChatWithStateModel) -> Self {
        let participant = Participant {
            chat_id: Snowflake::new(model.chat.id),
            user_id: Snowflake::new(model.user_id),
            joined_at: model.joined_at,
            state: ParticipantState {
                archived: model.archived,
                muted: model.muted,
                muted_until: model.muted_until,
                pinned: model.pinned,
            },
        };
        (Chat::from(model.chat), participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_chat_kind_from_column() {
        let now = Utc::now();
        let model = ChatModel {
            id: 1,
            kind: 1,
            name: Some("team".to_string()),
            avatar: None,
            creator_id: 7,
            created_at: now,
            last_activity_at: now,
        };

        let chat = Chat::from(model);
        assert!(chat.is_group());
        assert_eq!(chat.creator_id, Snowflake::new(7));
    }

    #[test]
    fn test_participant_keeps_stored_mute() {
        let past = Utc::now() - chrono::Duration::hours(1);
        let model = ParticipantModel {
            chat_id: 1,
            user_id: 2,
            joined_at: past,
            archived: false,
            muted: true,
            muted_until: Some(past),
            pinned: true,
        };

        let participant = Participant::from(model);
        assert!(participant.state.muted);
        assert!(!participant.state.is_effectively_muted(Utc::now()));
        assert!(participant.state.pinned);
    }
}
