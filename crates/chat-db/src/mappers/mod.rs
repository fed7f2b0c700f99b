//! Entity to model mappers
//!
//! - `From<Model> for Entity`: convert database rows to domain objects
//! - `MessageInsert`: flatten a message entity into bindable column values

mod chat;
mod message;
mod reaction;
mod user;

pub use message::MessageInsert;
