//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in chat-core.
//! Each repository handles database operations for a specific domain entity.

mod chat;
mod error;
mod message;
mod participant;
mod reaction;
mod read_marker;
mod user;

pub use chat::PgChatRepository;
pub use message::PgMessageRepository;
pub use participant::PgParticipantRepository;
pub use reaction::PgReactionRepository;
pub use read_marker::PgReadMarkerRepository;
pub use user::PgUserRepository;
