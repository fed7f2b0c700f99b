//! Event broadcaster
//!
//! Publishes one `ChatEvent` per successful mutation to the other
//! participants of the chat. Publishing is fire-and-forget: a failing bus is
//! logged and never turns a committed operation into an error.

use chat_core::events::UserSnapshot;
use chat_core::{ChatEvent, EventEnvelope, Snowflake};
use tracing::{debug, warn};

use super::context::ServiceContext;

pub struct EventBroadcaster<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventBroadcaster<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Publish `event` on `chat_id` to everyone in the chat except `actor`
    pub async fn broadcast(&self, chat_id: Snowflake, actor: Snowflake, event: ChatEvent) {
        let participants = match self.ctx.participant_repo().participant_ids(chat_id).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(
                    chat_id = %chat_id,
                    event_type = event.event_type(),
                    error = %e,
                    "Could not resolve event recipients"
                );
                return;
            }
        };

        self.publish(EventEnvelope::to_others(chat_id, actor, &participants, event))
            .await;
    }

    /// Publish an envelope whose recipients are already resolved
    pub async fn publish(&self, envelope: EventEnvelope) {
        match self.ctx.event_bus().publish(&envelope).await {
            Ok(()) => debug!(
                chat_id = %envelope.chat_id,
                event_type = envelope.event_type(),
                recipients = envelope.recipients.len(),
                "Event published"
            ),
            Err(e) => warn!(
                chat_id = %envelope.chat_id,
                event_type = envelope.event_type(),
                error = %e,
                "Event publish failed"
            ),
        }
    }

    /// Snapshot of a user for event payloads; unknown users get a placeholder
    pub async fn user_snapshot(&self, user_id: Snowflake) -> UserSnapshot {
        match self.ctx.user_repo().find_by_id(user_id).await {
            Ok(Some(user)) => UserSnapshot::from(&user),
            Ok(None) => UserSnapshot::unknown(user_id),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "User lookup for event snapshot failed");
                UserSnapshot::unknown(user_id)
            }
        }
    }
}
