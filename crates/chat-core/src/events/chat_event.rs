//! Chat events - notifications fanned out to the other participants of a chat
//!
//! Every payload carries a full snapshot of the affected resource so that
//! subscribers never need a follow-up fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{
    Chat, ChatKind, DeleteScope, Message, MessageType, Participant, Reaction, StateFlag, User,
};
use crate::value_objects::Snowflake;

/// All events published on a chat channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatEvent {
    // =========================================================================
    // Message Events
    // =========================================================================
    MessageSent(MessageSnapshot),
    MessageDeleted {
        message: MessageSnapshot,
        scope: DeleteScope,
    },
    MessageRead {
        chat_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        read_at: DateTime<Utc>,
    },

    // =========================================================================
    // Reaction Events
    // =========================================================================
    ReactionAdded(ReactionSnapshot),
    ReactionUpdated {
        reaction: ReactionSnapshot,
        previous_emoji: String,
    },
    ReactionRemoved(ReactionSnapshot),

    // =========================================================================
    // Chat & Participant Events
    // =========================================================================
    ChatCreated(ChatSnapshot),
    ParticipantJoined(ParticipantSnapshot),
    ParticipantLeft(ParticipantSnapshot),
    ChatStateChanged {
        chat_id: Snowflake,
        user_id: Snowflake,
        flag: StateFlag,
        value: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        muted_until: Option<DateTime<Utc>>,
    },

    // =========================================================================
    // Presence Events
    // =========================================================================
    TypingStart {
        chat_id: Snowflake,
        user: UserSnapshot,
    },
    TypingStop {
        chat_id: Snowflake,
        user: UserSnapshot,
    },
    OnlineStatusChanged {
        user: UserSnapshot,
        status: OnlineStatus,
    },
}

impl ChatEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MessageSent(_) => "MESSAGE_SENT",
            Self::MessageDeleted { .. } => "MESSAGE_DELETED",
            Self::MessageRead { .. } => "MESSAGE_READ",
            Self::ReactionAdded(_) => "REACTION_ADDED",
            Self::ReactionUpdated { .. } => "REACTION_UPDATED",
            Self::ReactionRemoved(_) => "REACTION_REMOVED",
            Self::ChatCreated(_) => "CHAT_CREATED",
            Self::ParticipantJoined(_) => "PARTICIPANT_JOINED",
            Self::ParticipantLeft(_) => "PARTICIPANT_LEFT",
            Self::ChatStateChanged { .. } => "CHAT_STATE_CHANGED",
            Self::TypingStart { .. } => "TYPING_START",
            Self::TypingStop { .. } => "TYPING_STOP",
            Self::OnlineStatusChanged { .. } => "ONLINE_STATUS_CHANGED",
        }
    }

    /// The `data` part of the serialized event
    pub fn payload(&self) -> serde_json::Value {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.remove("data").unwrap_or(serde_json::Value::Null)
            }
            _ => serde_json::Value::Null,
        }
    }
}

/// An event plus its routing: the chat channel and the explicit recipient set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub chat_id: Snowflake,
    pub actor_id: Snowflake,
    /// Participants of the chat minus the actor
    pub recipients: Vec<Snowflake>,
    pub event: ChatEvent,
    pub timestamp: DateTime<Utc>,
}

impl EventEnvelope {
    /// Build an envelope addressed to everyone in `participants` except `actor_id`
    pub fn to_others(
        chat_id: Snowflake,
        actor_id: Snowflake,
        participants: &[Snowflake],
        event: ChatEvent,
    ) -> Self {
        let recipients = participants
            .iter()
            .copied()
            .filter(|id| *id != actor_id)
            .collect();
        Self {
            chat_id,
            actor_id,
            recipients,
            event,
            timestamp: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

// ============================================================================
// Snapshots
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: Snowflake,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}

impl UserSnapshot {
    /// Snapshot for a user missing from the directory
    pub fn unknown(id: Snowflake) -> Self {
        Self {
            id,
            username: String::from("unknown"),
            display_name: None,
            avatar: None,
        }
    }
}

impl From<&User> for UserSnapshot {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    pub id: Snowflake,
    pub chat_id: Snowflake,
    pub sender: UserSnapshot,
    pub content: String,
    pub message_type: MessageType,
    pub blob_ref: Option<String>,
    pub reply_to: Option<Snowflake>,
    pub forwarded_from: Option<Snowflake>,
    pub deleted_for_sender: bool,
    pub deleted_for_all: bool,
    pub created_at: DateTime<Utc>,
}

impl MessageSnapshot {
    pub fn new(message: &Message, sender: UserSnapshot) -> Self {
        Self {
            id: message.id,
            chat_id: message.chat_id,
            sender,
            content: message.content.clone(),
            message_type: message.message_type,
            blob_ref: message.blob_ref.clone(),
            reply_to: message.reply_to,
            forwarded_from: message.forwarded_from,
            deleted_for_sender: message.deleted_for_sender,
            deleted_for_all: message.deleted_for_all,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionSnapshot {
    pub id: Snowflake,
    pub chat_id: Snowflake,
    pub message_id: Snowflake,
    pub emoji: String,
    pub user: UserSnapshot,
    pub created_at: DateTime<Utc>,
}

impl ReactionSnapshot {
    pub fn new(reaction: &Reaction, chat_id: Snowflake, user: UserSnapshot) -> Self {
        Self {
            id: reaction.id,
            chat_id,
            message_id: reaction.message_id,
            emoji: reaction.emoji.clone(),
            user,
            created_at: reaction.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSnapshot {
    pub id: Snowflake,
    pub kind: ChatKind,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub creator_id: Snowflake,
    pub participant_ids: Vec<Snowflake>,
    pub created_at: DateTime<Utc>,
}

impl ChatSnapshot {
    pub fn new(chat: &Chat, participant_ids: Vec<Snowflake>) -> Self {
        Self {
            id: chat.id,
            kind: chat.kind,
            name: chat.name.clone(),
            avatar: chat.avatar.clone(),
            creator_id: chat.creator_id,
            participant_ids,
            created_at: chat.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    pub chat_id: Snowflake,
    pub user: UserSnapshot,
    pub joined_at: DateTime<Utc>,
}

impl ParticipantSnapshot {
    pub fn new(participant: &Participant, user: UserSnapshot) -> Self {
        Self {
            chat_id: participant.chat_id,
            user,
            joined_at: participant.joined_at,
        }
    }
}

/// Online status broadcast by presence updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OnlineStatus {
    #[default]
    Online,
    Idle,
    Offline,
}
