//! Ports implemented by the infrastructure crates

mod event_bus;
mod repositories;

pub use event_bus::{EventBus, EventBusError};
pub use repositories::{
    ChatRepository, MessageQuery, MessageRepository, MessageSearch, ParticipantRepository,
    ReactionRepository, ReadMarkerRepository, RepoResult, SearchHit, TranscriptQuery,
    UserRepository,
};
