//! Message service
//!
//! Send, reply, forward, soft-delete and listing of messages.

use chat_core::entities::{DeleteScope, Message, MessageType, MAX_MESSAGE_LENGTH};
use chat_core::events::MessageSnapshot;
use chat_core::traits::MessageQuery;
use chat_core::{ChatEvent, DomainError, Snowflake};
use tracing::{debug, info, instrument};

use crate::dto::{ForwardBatchCommand, ListMessagesQuery, MessageResponse, SendMessageCommand};

use super::broadcaster::EventBroadcaster;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::guard::ParticipantGuard;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a message to a chat
    ///
    /// `reply_to` must name a message of the same chat that has not been
    /// deleted for everyone.
    #[instrument(skip(self, cmd), fields(message_type = ?cmd.message_type))]
    pub async fn send_message(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
        cmd: SendMessageCommand,
    ) -> ServiceResult<MessageResponse> {
        ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;

        validate_payload(&cmd.content, cmd.message_type, cmd.blob_ref.as_deref())?;

        if let Some(parent_id) = cmd.reply_to {
            let parent = self.ctx.message_repo().find_by_id(parent_id).await?;
            match parent {
                Some(p) if p.chat_id == chat_id && !p.deleted_for_all => {}
                _ => return Err(DomainError::InvalidReplyTarget.into()),
            }
        }

        let blob_ref = cmd.blob_ref.filter(|b| !b.trim().is_empty());
        let message = Message::new(
            self.ctx.generate_id(),
            chat_id,
            caller,
            cmd.content,
            cmd.message_type,
            blob_ref,
        )
        .in_reply_to(cmd.reply_to);

        self.store_and_announce(&message).await?;

        info!(
            message_id = %message.id,
            chat_id = %chat_id,
            sender_id = %caller,
            reply_to = ?message.reply_to,
            "Message sent"
        );

        Ok(MessageResponse::from(&message))
    }

    /// Reply to `parent_id` inside its own chat
    #[instrument(skip(self, cmd))]
    pub async fn reply(
        &self,
        parent_id: Snowflake,
        caller: Snowflake,
        cmd: SendMessageCommand,
    ) -> ServiceResult<MessageResponse> {
        let (parent, _) = ParticipantGuard::new(self.ctx)
            .require_visible_message(parent_id, caller)
            .await?;
        self.send_message(parent.chat_id, caller, cmd.replying_to(parent_id))
            .await
    }

    /// Copy a message into `target_chat_id`
    ///
    /// Only membership of the target chat is required.
    #[instrument(skip(self))]
    pub async fn forward_message(
        &self,
        message_id: Snowflake,
        caller: Snowflake,
        target_chat_id: Snowflake,
    ) -> ServiceResult<MessageResponse> {
        let original = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        let guard = ParticipantGuard::new(self.ctx);
        if !guard.is_visible(&original, caller).await? {
            return Err(DomainError::MessageNotFound(message_id).into());
        }
        guard.require_participant(target_chat_id, caller).await?;

        let message =
            Message::forward_of(&original, self.ctx.generate_id(), target_chat_id, caller);
        self.store_and_announce(&message).await?;

        info!(
            message_id = %message.id,
            forwarded_from = %original.id,
            chat_id = %target_chat_id,
            "Message forwarded"
        );

        Ok(MessageResponse::from(&message))
    }

    /// Forward several messages in input order, stopping at the first failure
    ///
    /// Messages forwarded before the failure stay forwarded.
    #[instrument(skip(self, cmd), fields(count = cmd.message_ids.len()))]
    pub async fn forward_batch(
        &self,
        caller: Snowflake,
        cmd: ForwardBatchCommand,
    ) -> ServiceResult<Vec<MessageResponse>> {
        if cmd.message_ids.is_empty() {
            return Err(ServiceError::validation("message_ids must not be empty"));
        }

        let mut forwarded = Vec::with_capacity(cmd.message_ids.len());
        for message_id in cmd.message_ids {
            forwarded.push(self.forward_message(message_id, caller, cmd.chat_id).await?);
        }
        Ok(forwarded)
    }

    /// Delete a message for the sender only or for everyone
    ///
    /// Only the sender may delete, and only while still a participant.
    /// Only a delete-for-all is broadcast.
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        message_id: Snowflake,
        caller: Snowflake,
        scope: DeleteScope,
    ) -> ServiceResult<()> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        ParticipantGuard::new(self.ctx)
            .require_participant(message.chat_id, caller)
            .await?;
        if !message.is_sent_by(caller) {
            return Err(DomainError::NotMessageSender.into());
        }

        match scope {
            DeleteScope::ForSender => {
                self.ctx
                    .message_repo()
                    .delete_for_sender(message_id, caller)
                    .await?;
                info!(message_id = %message_id, "Message hidden for sender");
            }
            DeleteScope::ForAll => {
                if message.deleted_for_all {
                    debug!(message_id = %message_id, "Message already deleted for all");
                    return Ok(());
                }
                self.ctx.message_repo().delete_for_all(message_id).await?;
                info!(message_id = %message_id, chat_id = %message.chat_id, "Message deleted for all");

                let broadcaster = EventBroadcaster::new(self.ctx);
                let sender = broadcaster.user_snapshot(caller).await;
                let mut snapshot = MessageSnapshot::new(&message, sender);
                snapshot.deleted_for_all = true;
                broadcaster
                    .broadcast(
                        message.chat_id,
                        caller,
                        ChatEvent::MessageDeleted {
                            message: snapshot,
                            scope,
                        },
                    )
                    .await;
            }
        }

        Ok(())
    }

    /// Visible messages of a chat, newest first
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
        query: ListMessagesQuery,
    ) -> ServiceResult<Vec<MessageResponse>> {
        ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;

        let messages = self
            .ctx
            .message_repo()
            .find_visible(
                chat_id,
                caller,
                MessageQuery {
                    before: query.before,
                    limit: query.limit(),
                },
            )
            .await?;

        debug!(count = messages.len(), "Messages listed");
        Ok(messages.iter().map(MessageResponse::from).collect())
    }

    /// Direct replies to a visible message, oldest first
    #[instrument(skip(self))]
    pub async fn replies(
        &self,
        message_id: Snowflake,
        caller: Snowflake,
    ) -> ServiceResult<Vec<MessageResponse>> {
        ParticipantGuard::new(self.ctx)
            .require_visible_message(message_id, caller)
            .await?;

        let replies = self
            .ctx
            .message_repo()
            .find_replies(message_id, caller)
            .await?;
        Ok(replies.iter().map(MessageResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_message(
        &self,
        message_id: Snowflake,
        caller: Snowflake,
    ) -> ServiceResult<MessageResponse> {
        let (message, _) = ParticipantGuard::new(self.ctx)
            .require_visible_message(message_id, caller)
            .await?;
        Ok(MessageResponse::from(&message))
    }

    /// Persist, bump chat activity and broadcast `MESSAGE_SENT`
    async fn store_and_announce(&self, message: &Message) -> ServiceResult<()> {
        self.ctx.message_repo().create(message).await?;
        self.ctx
            .chat_repo()
            .touch(message.chat_id, message.created_at)
            .await?;

        let broadcaster = EventBroadcaster::new(self.ctx);
        let sender = broadcaster.user_snapshot(message.sender_id).await;
        broadcaster
            .broadcast(
                message.chat_id,
                message.sender_id,
                ChatEvent::MessageSent(MessageSnapshot::new(message, sender)),
            )
            .await;
        Ok(())
    }
}

/// Text needs non-blank content; other types need a blob reference
fn validate_payload(
    content: &str,
    message_type: MessageType,
    blob_ref: Option<&str>,
) -> Result<(), DomainError> {
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(DomainError::ContentTooLong {
            max: MAX_MESSAGE_LENGTH,
        });
    }
    match message_type {
        MessageType::Text if content.trim().is_empty() => Err(DomainError::EmptyContent),
        MessageType::Text => Ok(()),
        _ if blob_ref.map_or(true, |b| b.trim().is_empty()) => Err(DomainError::ValidationError(
            format!("{} messages need a blob_ref", message_type.as_str()),
        )),
        _ => Ok(()),
    }
}
