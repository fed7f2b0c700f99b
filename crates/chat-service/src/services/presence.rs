//! Presence service
//!
//! Online status is not stored here; an update is fanned out to every chat
//! the user belongs to.

use chat_core::{ChatEvent, EventEnvelope, OnlineStatus, Snowflake};
use tracing::{info, instrument};

use crate::dto::PresenceResponse;

use super::broadcaster::EventBroadcaster;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Publish the caller's online status on each of their chats
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        caller: Snowflake,
        status: OnlineStatus,
    ) -> ServiceResult<PresenceResponse> {
        let chats = self.ctx.chat_repo().find_for_user(caller).await?;

        let broadcaster = EventBroadcaster::new(self.ctx);
        let user = broadcaster.user_snapshot(caller).await;

        for (chat, _) in &chats {
            let participants = self.ctx.participant_repo().participant_ids(chat.id).await?;
            broadcaster
                .publish(EventEnvelope::to_others(
                    chat.id,
                    caller,
                    &participants,
                    ChatEvent::OnlineStatusChanged {
                        user: user.clone(),
                        status,
                    },
                ))
                .await;
        }

        info!(user_id = %caller, status = ?status, chats = chats.len(), "Status updated");

        Ok(PresenceResponse {
            user_id: caller.to_string(),
            status,
            chats_notified: chats.len(),
        })
    }
}
