//! Redis Pub/Sub module.
//!
//! Publishes chat events for real-time fan-out across server instances.

mod channels;
mod publisher;

pub use channels::{PubSubChannel, CHAT_CHANNEL_PREFIX};
pub use publisher::{EventTarget, PubSubEvent, Publisher};
