//! # chat-core
//!
//! Domain layer containing entities, value objects, repository traits, and chat events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    is_effectively_muted, Chat, ChatKind, DeleteScope, Message, MessageType, Participant,
    ParticipantState, Reaction, ReadMarker, StateFlag, User, MAX_MESSAGE_LENGTH,
    MAX_PINNED_CHATS,
};
pub use error::DomainError;
pub use events::{ChatEvent, EventEnvelope, OnlineStatus};
pub use traits::{
    ChatRepository, EventBus, EventBusError, MessageQuery, MessageRepository, MessageSearch,
    ParticipantRepository, ReactionRepository, ReadMarkerRepository, RepoResult, SearchHit,
    TranscriptQuery, UserRepository,
};
pub use value_objects::{
    ExportFormat, MuteWindow, SearchTerm, Snowflake, SnowflakeGenerator, SnowflakeParseError,
};
