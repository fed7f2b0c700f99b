//! Participant-scoped access checks shared by every service
//!
//! A missing chat is always `NotFound`; an existing chat the caller does not
//! belong to is always `Forbidden`. The two are never folded together.

use chat_core::entities::{Chat, Message};
use chat_core::{DomainError, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct ParticipantGuard<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ParticipantGuard<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load `chat_id` and require `caller` to be a member
    pub async fn require_participant(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
    ) -> ServiceResult<Chat> {
        let chat = self
            .ctx
            .chat_repo()
            .find_by_id(chat_id)
            .await?
            .ok_or(DomainError::ChatNotFound(chat_id))?;

        if !self
            .ctx
            .participant_repo()
            .is_participant(chat_id, caller)
            .await?
        {
            return Err(DomainError::NotParticipant.into());
        }

        Ok(chat)
    }

    /// Load a message the caller can currently see
    ///
    /// Membership is checked before visibility, so a non-member gets
    /// `Forbidden` even for deleted messages. Deleted-for-all and
    /// hidden-by-caller messages are `NotFound`.
    pub async fn require_visible_message(
        &self,
        message_id: Snowflake,
        caller: Snowflake,
    ) -> ServiceResult<(Message, Chat)> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        let chat = self.require_participant(message.chat_id, caller).await?;

        if !self.is_visible(&message, caller).await? {
            return Err(DomainError::MessageNotFound(message_id).into());
        }

        Ok((message, chat))
    }

    /// Visible = not deleted for all and not hidden by `viewer`
    pub async fn is_visible(&self, message: &Message, viewer: Snowflake) -> ServiceResult<bool> {
        if message.deleted_for_all {
            return Ok(false);
        }
        let hidden = self
            .ctx
            .message_repo()
            .is_hidden_for(message.id, viewer)
            .await?;
        Ok(!hidden)
    }
}
