//! Read receipts

use chat_core::entities::ReadMarker;
use chat_core::{ChatEvent, DomainError, Snowflake};
use tracing::{debug, info, instrument};

use crate::dto::ReadMarkerResponse;

use super::broadcaster::EventBroadcaster;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::guard::ParticipantGuard;

pub struct ReadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReadService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mark a visible message as read by the caller
    ///
    /// Reading twice returns the original marker and publishes nothing.
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        message_id: Snowflake,
        caller: Snowflake,
    ) -> ServiceResult<ReadMarkerResponse> {
        let (message, _) = ParticipantGuard::new(self.ctx)
            .require_visible_message(message_id, caller)
            .await?;

        let marker = ReadMarker::new(message_id, caller);
        match self.ctx.read_marker_repo().create(&marker).await {
            Ok(()) => {}
            Err(DomainError::ReadMarkerExists) => {
                debug!(message_id = %message_id, "Message already read");
                let existing = self
                    .ctx
                    .read_marker_repo()
                    .find(message_id, caller)
                    .await?
                    .ok_or(DomainError::ReadMarkerExists)?;
                return Ok(ReadMarkerResponse::from(&existing));
            }
            Err(e) => return Err(e.into()),
        }

        info!(message_id = %message_id, user_id = %caller, "Message read");

        EventBroadcaster::new(self.ctx)
            .broadcast(
                message.chat_id,
                caller,
                ChatEvent::MessageRead {
                    chat_id: message.chat_id,
                    message_id,
                    user_id: caller,
                    read_at: marker.read_at,
                },
            )
            .await;

        Ok(ReadMarkerResponse::from(&marker))
    }

    /// Who has read a visible message
    #[instrument(skip(self))]
    pub async fn read_receipts(
        &self,
        message_id: Snowflake,
        caller: Snowflake,
    ) -> ServiceResult<Vec<ReadMarkerResponse>> {
        ParticipantGuard::new(self.ctx)
            .require_visible_message(message_id, caller)
            .await?;

        let markers = self.ctx.read_marker_repo().find_by_message(message_id).await?;
        Ok(markers.iter().map(ReadMarkerResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::SendMessageCommand;
    use crate::services::MessageService;
    use crate::testing::TestContext;

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let t = TestContext::new();
        let alice = t.user("alice").await;
        let bob = t.user("bob").await;
        let chat_id = t.private_chat(alice, bob).await;
        let sent = MessageService::new(&t.ctx)
            .send_message(chat_id, alice, SendMessageCommand::text("read me"))
            .await
            .unwrap();
        let message_id = Snowflake::parse(&sent.id).unwrap();
        let service = ReadService::new(&t.ctx);

        let first = service.mark_read(message_id, bob).await.unwrap();
        let second = service.mark_read(message_id, bob).await.unwrap();
        assert_eq!(first.read_at, second.read_at);

        let events = t.events.of_type("MESSAGE_READ");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].recipients, vec![alice]);

        let receipts = service.read_receipts(message_id, alice).await.unwrap();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].user_id, bob.to_string());
    }

    #[tokio::test]
    async fn test_non_member_cannot_mark_read() {
        let t = TestContext::new();
        let alice = t.user("alice").await;
        let bob = t.user("bob").await;
        let eve = t.user("eve").await;
        let chat_id = t.private_chat(alice, bob).await;
        let sent = MessageService::new(&t.ctx)
            .send_message(chat_id, alice, SendMessageCommand::text("private"))
            .await
            .unwrap();

        let err = ReadService::new(&t.ctx)
            .mark_read(Snowflake::parse(&sent.id).unwrap(), eve)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
