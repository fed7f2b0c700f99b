//! Real-time chat events

mod chat_event;

pub use chat_event::{
    ChatEvent, ChatSnapshot, EventEnvelope, MessageSnapshot, OnlineStatus, ParticipantSnapshot,
    ReactionSnapshot, UserSnapshot,
};
