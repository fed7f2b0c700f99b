//! Typing indicators
//!
//! Nothing is stored; the indicator only exists as an event.

use chat_core::{ChatEvent, Snowflake};
use tracing::instrument;

use super::broadcaster::EventBroadcaster;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::guard::ParticipantGuard;

pub struct TypingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TypingService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Announce that the caller started or stopped typing in a chat
    #[instrument(skip(self))]
    pub async fn set_typing(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
        typing: bool,
    ) -> ServiceResult<()> {
        ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;

        let broadcaster = EventBroadcaster::new(self.ctx);
        let user = broadcaster.user_snapshot(caller).await;
        let event = if typing {
            ChatEvent::TypingStart { chat_id, user }
        } else {
            ChatEvent::TypingStop { chat_id, user }
        };
        broadcaster.broadcast(chat_id, caller, event).await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;

    #[tokio::test]
    async fn test_typing_start_and_stop() {
        let t = TestContext::new();
        let alice = t.user("alice").await;
        let bob = t.user("bob").await;
        let carol = t.user("carol").await;
        let chat_id = t.group_chat(alice, &[bob, carol]).await;
        let service = TypingService::new(&t.ctx);

        service.set_typing(chat_id, bob, true).await.unwrap();
        service.set_typing(chat_id, bob, false).await.unwrap();

        let start = t.events.of_type("TYPING_START");
        assert_eq!(start.len(), 1);
        assert_eq!(start[0].recipients, vec![alice, carol]);
        assert_eq!(t.events.of_type("TYPING_STOP").len(), 1);
    }

    #[tokio::test]
    async fn test_typing_requires_membership() {
        let t = TestContext::new();
        let alice = t.user("alice").await;
        let bob = t.user("bob").await;
        let eve = t.user("eve").await;
        let chat_id = t.private_chat(alice, bob).await;

        let err = TypingService::new(&t.ctx)
            .set_typing(chat_id, eve, true)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
