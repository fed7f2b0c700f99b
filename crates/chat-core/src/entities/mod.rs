//! Domain entities - core business objects

mod chat;
mod message;
mod participant;
mod reaction;
mod read_marker;
mod user;

pub use chat::{Chat, ChatKind};
pub use message::{DeleteScope, Message, MessageType, MAX_MESSAGE_LENGTH};
pub use participant::{
    is_effectively_muted, Participant, ParticipantState, StateFlag, MAX_PINNED_CHATS,
};
pub use reaction::Reaction;
pub use read_marker::ReadMarker;
pub use user::User;
