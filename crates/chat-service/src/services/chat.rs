//! Chat service
//!
//! Chat creation, listing and membership.

use chat_core::entities::{Chat, ChatKind, User};
use chat_core::events::{ChatSnapshot, ParticipantSnapshot, UserSnapshot};
use chat_core::{ChatEvent, DomainError, Snowflake};
use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::dto::{
    AddParticipantsCommand, ChatListFilter, ChatResponse, CreateChatCommand, ParticipantResponse,
    UserResponse,
};

use super::broadcaster::EventBroadcaster;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::guard::ParticipantGuard;

/// Maximum length of a group chat name in characters
pub const MAX_CHAT_NAME_LENGTH: usize = 100;

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    /// Create a new ChatService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a private or group chat with the caller as creator
    ///
    /// A private chat that already exists between the two users is returned
    /// instead of creating a duplicate.
    #[instrument(skip(self, cmd), fields(kind = ?cmd.kind))]
    pub async fn create_chat(
        &self,
        caller: Snowflake,
        cmd: CreateChatCommand,
    ) -> ServiceResult<ChatResponse> {
        let others = dedupe_without(&cmd.participant_ids, caller);

        let chat = match cmd.kind {
            ChatKind::Private => {
                let [other] = others.as_slice() else {
                    return Err(DomainError::InvalidParticipants(
                        "a private chat needs exactly one other user".to_string(),
                    )
                    .into());
                };
                if cmd.name.is_some() {
                    return Err(ServiceError::validation("private chats have no name"));
                }
                self.require_users(&[caller, *other]).await?;

                if let Some(existing) = self
                    .ctx
                    .chat_repo()
                    .find_private_between(caller, *other)
                    .await?
                {
                    debug!(chat_id = %existing.id, "Private chat already exists");
                    return self.get_chat(existing.id, caller).await;
                }
                Chat::new_private(self.ctx.generate_id(), caller)
            }
            ChatKind::Group => {
                let name = cmd
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| ServiceError::validation("group chats need a name"))?;
                if name.chars().count() > MAX_CHAT_NAME_LENGTH {
                    return Err(ServiceError::validation(format!(
                        "chat name must be at most {MAX_CHAT_NAME_LENGTH} characters"
                    )));
                }
                let mut members = others.clone();
                members.push(caller);
                self.require_users(&members).await?;

                Chat::new_group(
                    self.ctx.generate_id(),
                    caller,
                    name.to_string(),
                    cmd.avatar.clone(),
                )
            }
        };

        let mut participant_ids = Vec::with_capacity(others.len() + 1);
        participant_ids.push(caller);
        participant_ids.extend(others);

        self.ctx.chat_repo().create(&chat, &participant_ids).await?;

        info!(
            chat_id = %chat.id,
            creator_id = %caller,
            participants = participant_ids.len(),
            "Chat created"
        );

        EventBroadcaster::new(self.ctx)
            .broadcast(
                chat.id,
                caller,
                ChatEvent::ChatCreated(ChatSnapshot::new(&chat, participant_ids)),
            )
            .await;

        Ok(ChatResponse::new(&chat, &Default::default(), Utc::now()))
    }

    /// Get a chat with the caller's own flags
    #[instrument(skip(self))]
    pub async fn get_chat(&self, chat_id: Snowflake, caller: Snowflake) -> ServiceResult<ChatResponse> {
        let chat = ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;
        let participant = self
            .ctx
            .participant_repo()
            .find(chat_id, caller)
            .await?
            .ok_or(DomainError::NotParticipant)?;

        Ok(ChatResponse::new(&chat, &participant.state, Utc::now()))
    }

    /// List the caller's chats
    ///
    /// Pinned chats come first, then most recent activity, then newest id.
    #[instrument(skip(self))]
    pub async fn list_chats(
        &self,
        caller: Snowflake,
        filter: ChatListFilter,
    ) -> ServiceResult<Vec<ChatResponse>> {
        let now = Utc::now();
        let mut rows: Vec<_> = self
            .ctx
            .chat_repo()
            .find_for_user(caller)
            .await?
            .into_iter()
            .filter(|(_, participant)| filter.matches(&participant.state, now))
            .collect();

        rows.sort_by(|(a, pa), (b, pb)| {
            pb.state
                .pinned
                .cmp(&pa.state.pinned)
                .then_with(|| b.last_activity_at.cmp(&a.last_activity_at))
                .then_with(|| b.id.cmp(&a.id))
        });

        debug!(count = rows.len(), "Chats listed");

        Ok(rows
            .iter()
            .map(|(chat, participant)| ChatResponse::new(chat, &participant.state, now))
            .collect())
    }

    /// List the members of a chat
    #[instrument(skip(self))]
    pub async fn list_participants(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
    ) -> ServiceResult<Vec<ParticipantResponse>> {
        ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;

        let participants = self.ctx.participant_repo().find_by_chat(chat_id).await?;
        let ids: Vec<_> = participants.iter().map(|p| p.user_id).collect();
        let users = self.ctx.user_repo().find_by_ids(&ids).await?;

        Ok(participants
            .iter()
            .map(|p| ParticipantResponse::new(p, UserResponse::lookup(&users, p.user_id)))
            .collect())
    }

    /// Add users to a group chat; existing members are skipped
    #[instrument(skip(self, cmd))]
    pub async fn add_participants(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
        cmd: AddParticipantsCommand,
    ) -> ServiceResult<Vec<ParticipantResponse>> {
        let chat = ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;
        if chat.is_private() {
            return Err(DomainError::PrivateChatMembershipFixed.into());
        }

        let user_ids = dedupe_without(&cmd.user_ids, caller);
        if user_ids.is_empty() {
            return Err(DomainError::InvalidParticipants("no users to add".to_string()).into());
        }
        let users = self.require_users(&user_ids).await?;

        let added = self.ctx.participant_repo().add(chat_id, &user_ids).await?;

        info!(chat_id = %chat_id, added = added.len(), "Participants added");

        let broadcaster = EventBroadcaster::new(self.ctx);
        let mut responses = Vec::with_capacity(added.len());
        for participant in &added {
            let user = users.iter().find(|u| u.id == participant.user_id);
            let snapshot = user.map_or_else(
                || UserSnapshot::unknown(participant.user_id),
                UserSnapshot::from,
            );
            broadcaster
                .broadcast(
                    chat_id,
                    caller,
                    ChatEvent::ParticipantJoined(ParticipantSnapshot::new(participant, snapshot)),
                )
                .await;
            responses.push(ParticipantResponse::new(
                participant,
                UserResponse::lookup(&users, participant.user_id),
            ));
        }

        Ok(responses)
    }

    /// Remove a member from a group chat
    ///
    /// Anyone may leave; removing someone else is reserved to the creator.
    /// Messages of the removed user stay in the chat.
    #[instrument(skip(self))]
    pub async fn remove_participant(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        let chat = ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;
        if chat.is_private() {
            return Err(DomainError::PrivateChatMembershipFixed.into());
        }
        if user_id != caller && !chat.is_creator(caller) {
            return Err(DomainError::NotChatCreator.into());
        }

        let participant = self
            .ctx
            .participant_repo()
            .find(chat_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Participant", user_id.to_string()))?;

        if !self.ctx.participant_repo().remove(chat_id, user_id).await? {
            return Err(ServiceError::not_found("Participant", user_id.to_string()));
        }

        info!(chat_id = %chat_id, user_id = %user_id, removed_by = %caller, "Participant removed");

        let broadcaster = EventBroadcaster::new(self.ctx);
        let user = broadcaster.user_snapshot(user_id).await;
        broadcaster
            .broadcast(
                chat_id,
                caller,
                ChatEvent::ParticipantLeft(ParticipantSnapshot::new(&participant, user)),
            )
            .await;

        Ok(())
    }

    /// Every id must exist in the user directory
    async fn require_users(&self, ids: &[Snowflake]) -> ServiceResult<Vec<User>> {
        let users = self.ctx.user_repo().find_by_ids(ids).await?;
        if let Some(missing) = ids.iter().find(|id| !users.iter().any(|u| u.id == **id)) {
            return Err(DomainError::InvalidParticipants(format!("unknown user {missing}")).into());
        }
        Ok(users)
    }
}

/// `ids` without duplicates and without `exclude`, first occurrence wins
fn dedupe_without(ids: &[Snowflake], exclude: Snowflake) -> Vec<Snowflake> {
    let mut out: Vec<Snowflake> = Vec::with_capacity(ids.len());
    for id in ids {
        if *id != exclude && !out.contains(id) {
            out.push(*id);
        }
    }
    out
}
