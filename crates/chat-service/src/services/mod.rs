//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod broadcaster;
pub mod chat;
pub mod chat_state;
pub mod context;
pub mod error;
pub mod export;
pub mod guard;
pub mod message;
pub mod presence;
pub mod reaction;
pub mod read;
pub mod search;
pub mod typing;

// Re-export all services for convenience
pub use broadcaster::EventBroadcaster;
pub use chat::ChatService;
pub use chat_state::ChatStateService;
pub use context::{ServiceContext, ServiceContextBuilder, DEFAULT_EXPORT_MAX_PAGE_SIZE};
pub use error::{ServiceError, ServiceResult};
pub use export::ExportService;
pub use guard::ParticipantGuard;
pub use message::MessageService;
pub use presence::PresenceService;
pub use reaction::ReactionService;
pub use read::ReadService;
pub use search::SearchService;
pub use typing::TypingService;

/// Row offset of a 1-based page, rejecting pages past the addressable range
pub(crate) fn page_offset(page: i64, per_page: i64) -> ServiceResult<i64> {
    page.checked_sub(1)
        .and_then(|skipped| skipped.checked_mul(per_page))
        .filter(|offset| *offset >= 0)
        .ok_or_else(|| ServiceError::validation("page is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{ChatListFilter, MuteChatCommand, SendMessageCommand};
    use crate::testing::TestContext;
    use chat_core::value_objects::{RED_HEART, THUMBS_UP};

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 20).unwrap(), 0);
        assert_eq!(page_offset(3, 20).unwrap(), 40);
        let err = page_offset(i64::MAX, 20).unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert!(page_offset(0, 20).is_err());
    }
    use chat_core::Snowflake;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_private_chat_walkthrough() {
        let t = TestContext::new();
        let alice = t.user("alice").await;
        let bob = t.user("bob").await;
        let chat_id = t.private_chat(alice, bob).await;
        let state = ChatStateService::new(&t.ctx);

        // Alice mutes for eight hours; Bob's view is untouched
        let muted = state
            .mute(
                chat_id,
                alice,
                MuteChatCommand {
                    until: Some(Utc::now() + Duration::hours(8)),
                },
            )
            .await
            .unwrap();
        assert!(muted.muted);
        let bobs_view = ChatService::new(&t.ctx).get_chat(chat_id, bob).await.unwrap();
        assert!(!bobs_view.muted);

        // Archived chats still receive messages
        state.archive(chat_id, alice).await.unwrap();
        let sent = MessageService::new(&t.ctx)
            .send_message(chat_id, bob, SendMessageCommand::text("still there?"))
            .await
            .unwrap();
        let history = MessageService::new(&t.ctx)
            .list_messages(chat_id, alice, Default::default())
            .await
            .unwrap();
        assert_eq!(history[0].id, sent.id);

        let archived = ChatService::new(&t.ctx)
            .list_chats(
                alice,
                ChatListFilter {
                    archived: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(archived.len(), 1);

        // Two distinct emojis are fine, a repeated one is not
        let message_id = Snowflake::parse(&sent.id).unwrap();
        let reactions = ReactionService::new(&t.ctx);
        reactions.add_reaction(message_id, alice, THUMBS_UP).await.unwrap();
        reactions.add_reaction(message_id, alice, RED_HEART).await.unwrap();
        let err = reactions
            .add_reaction(message_id, alice, THUMBS_UP)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "REACTION_ALREADY_EXISTS");
    }
}
