//! Redis Pub/Sub publisher.
//!
//! Publishes chat events to Redis channels; gateway processes subscribed to
//! `chat:{id}` deliver them to the listed recipients.

use async_trait::async_trait;
use chat_core::{EventBus, EventBusError, EventEnvelope};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::pool::{RedisPool, RedisPoolError, RedisResult};
use crate::pubsub::PubSubChannel;

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Event type name (e.g., "MESSAGE_SENT", "REACTION_ADDED")
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload
    pub data: serde_json::Value,
    /// Routing information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<EventTarget>,
}

/// Target information for event routing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    /// Users that should receive the event
    #[serde(default)]
    pub recipients: Vec<String>,
    /// User IDs to exclude from receiving this event (the actor)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub exclude_users: Vec<String>,
}

impl PubSubEvent {
    /// Create a new event
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
            target: None,
        }
    }

    /// Add target information
    #[must_use]
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Build the wire event for an envelope
    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Self, serde_json::Error> {
        let data = match serde_json::to_value(&envelope.event)? {
            serde_json::Value::Object(mut map) => {
                map.remove("data").unwrap_or(serde_json::Value::Null)
            }
            other => other,
        };

        let target = EventTarget {
            chat_id: Some(envelope.chat_id.to_string()),
            recipients: envelope.recipients.iter().map(ToString::to_string).collect(),
            exclude_users: vec![envelope.actor_id.to_string()],
        };

        Ok(Self::new(envelope.event_type(), data).with_target(target))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel, returning the number of subscribers reached
    pub async fn publish_to(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }
}

#[async_trait]
impl EventBus for Publisher {
    async fn publish(&self, envelope: &EventEnvelope) -> Result<(), EventBusError> {
        let event = PubSubEvent::from_envelope(envelope)
            .map_err(|e| EventBusError::Serialization(e.to_string()))?;

        self.publish_to(&PubSubChannel::chat(envelope.chat_id), &event)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                RedisPoolError::Serialization(e) => EventBusError::Serialization(e.to_string()),
                other => EventBusError::Transport(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::events::UserSnapshot;
    use chat_core::{ChatEvent, Snowflake};

    fn typing_envelope() -> EventEnvelope {
        let chat_id = Snowflake::new(10);
        let actor = Snowflake::new(1);
        EventEnvelope::to_others(
            chat_id,
            actor,
            &[actor, Snowflake::new(2), Snowflake::new(3)],
            ChatEvent::TypingStart {
                chat_id,
                user: UserSnapshot::unknown(actor),
            },
        )
    }

    #[test]
    fn test_pubsub_event_creation() {
        let data = serde_json::json!({"id": "12345", "content": "Hello!"});

        let event = PubSubEvent::new("MESSAGE_SENT", data.clone());
        assert_eq!(event.event_type, "MESSAGE_SENT");
        assert_eq!(event.data, data);
        assert!(event.target.is_none());
    }

    #[test]
    fn test_event_from_envelope() {
        let event = PubSubEvent::from_envelope(&typing_envelope()).unwrap();

        assert_eq!(event.event_type, "TYPING_START");
        assert_eq!(event.data["chat_id"], "10");
        let target = event.target.unwrap();
        assert_eq!(target.chat_id.as_deref(), Some("10"));
        assert_eq!(target.recipients, vec!["2".to_string(), "3".to_string()]);
        assert_eq!(target.exclude_users, vec!["1".to_string()]);
    }

    #[test]
    fn test_event_serialization_uses_type_key() {
        let json = PubSubEvent::from_envelope(&typing_envelope())
            .unwrap()
            .to_json()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "TYPING_START");
        assert!(value.get("event_type").is_none());
        assert_eq!(value["target"]["recipients"][0], "2");
    }
}
