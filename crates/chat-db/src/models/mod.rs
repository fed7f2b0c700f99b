//! Database models - SQLx-compatible structs for PostgreSQL tables

mod chat;
mod message;
mod reaction;
mod user;

pub use chat::{ChatModel, ChatWithStateModel, ParticipantModel};
pub use message::{MessageModel, SearchHitModel};
pub use reaction::{ReactionModel, ReadMarkerModel};
pub use user::UserModel;
