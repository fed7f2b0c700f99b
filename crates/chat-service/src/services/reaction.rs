//! Reaction service
//!
//! Handles message reactions (add, update, remove, list). A user may react
//! to a message with several different emojis but never twice with the same.

use chat_core::entities::Reaction;
use chat_core::events::ReactionSnapshot;
use chat_core::value_objects::{is_allowed_emoji, normalize_emoji};
use chat_core::{ChatEvent, DomainError, Snowflake};
use tracing::{debug, info, instrument};

use crate::dto::{ReactionResponse, UserResponse};

use super::broadcaster::EventBroadcaster;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::guard::ParticipantGuard;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// React to a visible message
    #[instrument(skip(self))]
    pub async fn add_reaction(
        &self,
        message_id: Snowflake,
        caller: Snowflake,
        emoji: &str,
    ) -> ServiceResult<ReactionResponse> {
        let (message, _) = ParticipantGuard::new(self.ctx)
            .require_visible_message(message_id, caller)
            .await?;
        let emoji = allowed(emoji)?;

        let reaction = Reaction::new(self.ctx.generate_id(), message_id, caller, emoji.to_string());
        self.ctx.reaction_repo().create(&reaction).await?;

        info!(
            reaction_id = %reaction.id,
            message_id = %message_id,
            user_id = %caller,
            emoji = %reaction.emoji,
            "Reaction added"
        );

        let broadcaster = EventBroadcaster::new(self.ctx);
        let user = broadcaster.user_snapshot(caller).await;
        broadcaster
            .broadcast(
                message.chat_id,
                caller,
                ChatEvent::ReactionAdded(ReactionSnapshot::new(&reaction, message.chat_id, user)),
            )
            .await;

        self.respond(&reaction).await
    }

    /// Change the emoji of the caller's own reaction
    #[instrument(skip(self))]
    pub async fn update_reaction(
        &self,
        reaction_id: Snowflake,
        caller: Snowflake,
        emoji: &str,
    ) -> ServiceResult<ReactionResponse> {
        let current = self.owned_reaction(reaction_id, caller).await?;
        let emoji = allowed(emoji)?;

        if current.is_emoji(emoji) {
            debug!(reaction_id = %reaction_id, "Reaction emoji unchanged");
            return self.respond(&current).await;
        }

        let updated = self
            .ctx
            .reaction_repo()
            .update_emoji(reaction_id, emoji)
            .await?
            .ok_or(DomainError::ReactionNotFound(reaction_id))?;

        info!(
            reaction_id = %reaction_id,
            from = %current.emoji,
            to = %updated.emoji,
            "Reaction updated"
        );

        if let Some(chat_id) = self.chat_of(updated.message_id).await? {
            let broadcaster = EventBroadcaster::new(self.ctx);
            let user = broadcaster.user_snapshot(caller).await;
            broadcaster
                .broadcast(
                    chat_id,
                    caller,
                    ChatEvent::ReactionUpdated {
                        reaction: ReactionSnapshot::new(&updated, chat_id, user),
                        previous_emoji: current.emoji,
                    },
                )
                .await;
        }

        self.respond(&updated).await
    }

    /// Remove the caller's own reaction
    #[instrument(skip(self))]
    pub async fn remove_reaction(&self, reaction_id: Snowflake, caller: Snowflake) -> ServiceResult<()> {
        let reaction = self.owned_reaction(reaction_id, caller).await?;

        if !self.ctx.reaction_repo().delete(reaction_id).await? {
            return Err(DomainError::ReactionNotFound(reaction_id).into());
        }

        info!(reaction_id = %reaction_id, message_id = %reaction.message_id, "Reaction removed");

        if let Some(chat_id) = self.chat_of(reaction.message_id).await? {
            let broadcaster = EventBroadcaster::new(self.ctx);
            let user = broadcaster.user_snapshot(caller).await;
            broadcaster
                .broadcast(
                    chat_id,
                    caller,
                    ChatEvent::ReactionRemoved(ReactionSnapshot::new(&reaction, chat_id, user)),
                )
                .await;
        }

        Ok(())
    }

    /// All reactions on a visible message, oldest first
    #[instrument(skip(self))]
    pub async fn list_reactions(
        &self,
        message_id: Snowflake,
        caller: Snowflake,
    ) -> ServiceResult<Vec<ReactionResponse>> {
        ParticipantGuard::new(self.ctx)
            .require_visible_message(message_id, caller)
            .await?;

        let reactions = self.ctx.reaction_repo().find_by_message(message_id).await?;
        let mut user_ids: Vec<_> = reactions.iter().map(|r| r.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let users = self.ctx.user_repo().find_by_ids(&user_ids).await?;

        Ok(reactions
            .iter()
            .map(|r| ReactionResponse::new(r, UserResponse::lookup(&users, r.user_id)))
            .collect())
    }

    async fn owned_reaction(&self, reaction_id: Snowflake, caller: Snowflake) -> ServiceResult<Reaction> {
        let reaction = self
            .ctx
            .reaction_repo()
            .find_by_id(reaction_id)
            .await?
            .ok_or(DomainError::ReactionNotFound(reaction_id))?;
        if let Some(chat_id) = self.chat_of(reaction.message_id).await? {
            ParticipantGuard::new(self.ctx)
                .require_participant(chat_id, caller)
                .await?;
        }
        if !reaction.is_owned_by(caller) {
            return Err(DomainError::NotReactionOwner.into());
        }
        Ok(reaction)
    }

    async fn chat_of(&self, message_id: Snowflake) -> ServiceResult<Option<Snowflake>> {
        Ok(self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .map(|m| m.chat_id))
    }

    async fn respond(&self, reaction: &Reaction) -> ServiceResult<ReactionResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(reaction.user_id)
            .await?
            .map_or_else(|| UserResponse::unknown(reaction.user_id), |u| UserResponse::from(&u));
        Ok(ReactionResponse::new(reaction, user))
    }
}

/// Normalize `emoji` and check it against the allowlist
fn allowed(emoji: &str) -> Result<&str, DomainError> {
    let emoji = normalize_emoji(emoji);
    if is_allowed_emoji(emoji) {
        Ok(emoji)
    } else {
        Err(DomainError::EmojiNotAllowed(emoji.to_string()))
    }
}
