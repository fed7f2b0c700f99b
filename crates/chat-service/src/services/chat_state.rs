//! Per-participant chat state
//!
//! Archive, mute and pin are flags on the caller's own participant row.
//! They never affect other participants' view of the chat.

use chat_core::entities::{Chat, Participant, StateFlag, MAX_PINNED_CHATS};
use chat_core::{ChatEvent, DomainError, Snowflake};
use chrono::Utc;
use tracing::{info, instrument};

use crate::dto::{ChatResponse, MuteChatCommand};

use super::broadcaster::EventBroadcaster;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::guard::ParticipantGuard;

pub struct ChatStateService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatStateService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn archive(&self, chat_id: Snowflake, caller: Snowflake) -> ServiceResult<ChatResponse> {
        self.set_archived(chat_id, caller, true).await
    }

    #[instrument(skip(self))]
    pub async fn unarchive(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
    ) -> ServiceResult<ChatResponse> {
        self.set_archived(chat_id, caller, false).await
    }

    /// Mute a chat, indefinitely or until `cmd.until`
    ///
    /// A bounded mute must end inside the configured window from now.
    #[instrument(skip(self))]
    pub async fn mute(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
        cmd: MuteChatCommand,
    ) -> ServiceResult<ChatResponse> {
        let chat = ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;
        self.ctx.mute_window().validate(cmd.until, Utc::now())?;

        let participant = self
            .ctx
            .participant_repo()
            .set_muted(chat_id, caller, true, cmd.until)
            .await?;
        self.finish(&chat, participant, StateFlag::Muted, true).await
    }

    /// Clear the mute flag and its end
    #[instrument(skip(self))]
    pub async fn unmute(&self, chat_id: Snowflake, caller: Snowflake) -> ServiceResult<ChatResponse> {
        let chat = ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;
        let participant = self
            .ctx
            .participant_repo()
            .set_muted(chat_id, caller, false, None)
            .await?;
        self.finish(&chat, participant, StateFlag::Muted, false).await
    }

    /// Pin a chat; fails once the caller already has the maximum pinned
    #[instrument(skip(self))]
    pub async fn pin(&self, chat_id: Snowflake, caller: Snowflake) -> ServiceResult<ChatResponse> {
        self.set_pinned(chat_id, caller, true).await
    }

    #[instrument(skip(self))]
    pub async fn unpin(&self, chat_id: Snowflake, caller: Snowflake) -> ServiceResult<ChatResponse> {
        self.set_pinned(chat_id, caller, false).await
    }

    async fn set_archived(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
        archived: bool,
    ) -> ServiceResult<ChatResponse> {
        let chat = ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;
        let participant = self
            .ctx
            .participant_repo()
            .set_archived(chat_id, caller, archived)
            .await?;
        self.finish(&chat, participant, StateFlag::Archived, archived)
            .await
    }

    async fn set_pinned(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
        pinned: bool,
    ) -> ServiceResult<ChatResponse> {
        let chat = ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;
        let participant = self
            .ctx
            .participant_repo()
            .set_pinned(chat_id, caller, pinned, MAX_PINNED_CHATS)
            .await?;
        self.finish(&chat, participant, StateFlag::Pinned, pinned).await
    }

    /// Log, broadcast and render the updated row
    async fn finish(
        &self,
        chat: &Chat,
        participant: Option<Participant>,
        flag: StateFlag,
        value: bool,
    ) -> ServiceResult<ChatResponse> {
        // `None`: the caller left between the guard and the update
        let participant = participant.ok_or(DomainError::NotParticipant)?;

        info!(
            chat_id = %chat.id,
            user_id = %participant.user_id,
            flag = ?flag,
            value,
            "Chat state changed"
        );

        EventBroadcaster::new(self.ctx)
            .broadcast(
                chat.id,
                participant.user_id,
                ChatEvent::ChatStateChanged {
                    chat_id: chat.id,
                    user_id: participant.user_id,
                    flag,
                    value,
                    muted_until: if flag == StateFlag::Muted {
                        participant.state.muted_until
                    } else {
                        None
                    },
                },
            )
            .await;

        Ok(ChatResponse::new(chat, &participant.state, Utc::now()))
    }
}
