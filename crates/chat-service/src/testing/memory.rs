//! In-memory implementation of every repository port
//!
//! One `InMemoryDatabase` holds all tables behind a single lock, so
//! cross-table rules (visibility, pin limit, search scope) behave like the
//! Postgres implementation without a database.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chat_core::entities::{Chat, ChatKind, Message, Participant, Reaction, ReadMarker, User};
use chat_core::traits::{
    ChatRepository, MessageQuery, MessageRepository, MessageSearch, ParticipantRepository,
    ReactionRepository, ReadMarkerRepository, RepoResult, SearchHit, TranscriptQuery,
    UserRepository,
};
use chat_core::{DomainError, Snowflake};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

#[derive(Default)]
struct Tables {
    users: HashMap<Snowflake, User>,
    chats: HashMap<Snowflake, Chat>,
    /// Insertion order doubles as `joined_at` order
    participants: Vec<Participant>,
    messages: HashMap<Snowflake, Message>,
    deletions: HashSet<(Snowflake, Snowflake)>,
    reactions: HashMap<Snowflake, Reaction>,
    read_markers: Vec<ReadMarker>,
}

impl Tables {
    fn participant_mut(&mut self, chat_id: Snowflake, user_id: Snowflake) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.chat_id == chat_id && p.user_id == user_id)
    }

    fn is_participant(&self, chat_id: Snowflake, user_id: Snowflake) -> bool {
        self.participants
            .iter()
            .any(|p| p.chat_id == chat_id && p.user_id == user_id)
    }

    fn is_visible(&self, message: &Message, viewer: Snowflake) -> bool {
        !message.deleted_for_all && !self.deletions.contains(&(message.id, viewer))
    }

    fn visible_in_chat(&self, chat_id: Snowflake, viewer: Snowflake) -> Vec<Message> {
        self.messages
            .values()
            .filter(|m| m.chat_id == chat_id && self.is_visible(m, viewer))
            .cloned()
            .collect()
    }
}

fn sort_key(message: &Message) -> (DateTime<Utc>, Snowflake) {
    (message.created_at, message.id)
}

fn page<T>(rows: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(0);
    let limit = usize::try_from(limit).unwrap_or(0);
    rows.into_iter().skip(offset).take(limit).collect()
}

/// All repositories over shared in-process tables
#[derive(Default)]
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a participant row as-is, bypassing service rules
    ///
    /// Used to simulate time passing, e.g. a mute whose end is already behind us.
    pub fn put_participant(&self, participant: Participant) {
        let mut tables = self.tables.write();
        match tables.participant_mut(participant.chat_id, participant.user_id) {
            Some(row) => *row = participant,
            None => tables.participants.push(participant),
        }
    }

    pub fn message_count(&self) -> usize {
        self.tables.read().messages.len()
    }
}

// ============================================================================
// Users
// ============================================================================

#[async_trait]
impl UserRepository for InMemoryDatabase {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        let tables = self.tables.read();
        Ok(ids.iter().filter_map(|id| tables.users.get(id).cloned()).collect())
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::ValidationError(format!(
                "username {} is taken",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }
}

// ============================================================================
// Chats
// ============================================================================

#[async_trait]
impl ChatRepository for InMemoryDatabase {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>> {
        Ok(self.tables.read().chats.get(&id).cloned())
    }

    async fn find_private_between(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Chat>> {
        let tables = self.tables.read();
        let mut candidates: Vec<&Chat> = tables
            .chats
            .values()
            .filter(|c| c.kind == ChatKind::Private)
            .filter(|c| tables.is_participant(c.id, user_a) && tables.is_participant(c.id, user_b))
            .collect();
        candidates.sort_by_key(|c| c.id);
        Ok(candidates.first().map(|c| (*c).clone()))
    }

    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<(Chat, Participant)>> {
        let tables = self.tables.read();
        Ok(tables
            .participants
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter_map(|p| tables.chats.get(&p.chat_id).map(|c| (c.clone(), p.clone())))
            .collect())
    }

    async fn create(&self, chat: &Chat, participant_ids: &[Snowflake]) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if tables.chats.contains_key(&chat.id) {
            return Err(DomainError::ValidationError(format!("chat {} exists", chat.id)));
        }
        tables.chats.insert(chat.id, chat.clone());
        for user_id in participant_ids {
            if !tables.is_participant(chat.id, *user_id) {
                let mut participant = Participant::new(chat.id, *user_id);
                participant.joined_at = chat.created_at;
                tables.participants.push(participant);
            }
        }
        Ok(())
    }

    async fn touch(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()> {
        if let Some(chat) = self.tables.write().chats.get_mut(&id) {
            chat.last_activity_at = chat.last_activity_at.max(at);
        }
        Ok(())
    }
}

// ============================================================================
// Participants
// ============================================================================

#[async_trait]
impl ParticipantRepository for InMemoryDatabase {
    async fn is_participant(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.tables.read().is_participant(chat_id, user_id))
    }

    async fn find(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Participant>> {
        Ok(self
            .tables
            .read()
            .participants
            .iter()
            .find(|p| p.chat_id == chat_id && p.user_id == user_id)
            .cloned())
    }

    async fn find_by_chat(&self, chat_id: Snowflake) -> RepoResult<Vec<Participant>> {
        Ok(self
            .tables
            .read()
            .participants
            .iter()
            .filter(|p| p.chat_id == chat_id)
            .cloned()
            .collect())
    }

    async fn participant_ids(&self, chat_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .tables
            .read()
            .participants
            .iter()
            .filter(|p| p.chat_id == chat_id)
            .map(|p| p.user_id)
            .collect())
    }

    async fn add(&self, chat_id: Snowflake, user_ids: &[Snowflake]) -> RepoResult<Vec<Participant>> {
        let mut tables = self.tables.write();
        if !tables.chats.contains_key(&chat_id) {
            return Err(DomainError::ChatNotFound(chat_id));
        }
        let mut added = Vec::new();
        for user_id in user_ids {
            if !tables.is_participant(chat_id, *user_id) {
                let participant = Participant::new(chat_id, *user_id);
                tables.participants.push(participant.clone());
                added.push(participant);
            }
        }
        Ok(added)
    }

    async fn remove(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.participants.len();
        tables
            .participants
            .retain(|p| !(p.chat_id == chat_id && p.user_id == user_id));
        Ok(tables.participants.len() < before)
    }

    async fn set_archived(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        archived: bool,
    ) -> RepoResult<Option<Participant>> {
        let mut tables = self.tables.write();
        Ok(tables.participant_mut(chat_id, user_id).map(|p| {
            p.state.archived = archived;
            p.clone()
        }))
    }

    async fn set_muted(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        muted: bool,
        until: Option<DateTime<Utc>>,
    ) -> RepoResult<Option<Participant>> {
        let mut tables = self.tables.write();
        Ok(tables.participant_mut(chat_id, user_id).map(|p| {
            p.state.muted = muted;
            p.state.muted_until = if muted { until } else { None };
            p.clone()
        }))
    }

    async fn set_pinned(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        pinned: bool,
        max_pinned: usize,
    ) -> RepoResult<Option<Participant>> {
        let mut tables = self.tables.write();
        if !tables.is_participant(chat_id, user_id) {
            return Ok(None);
        }
        if pinned {
            let others = tables
                .participants
                .iter()
                .filter(|p| p.user_id == user_id && p.chat_id != chat_id && p.state.pinned)
                .count();
            if others >= max_pinned {
                return Err(DomainError::PinLimitReached { max: max_pinned });
            }
        }
        Ok(tables.participant_mut(chat_id, user_id).map(|p| {
            p.state.pinned = pinned;
            p.clone()
        }))
    }
}

// ============================================================================
// Messages
// ============================================================================

#[async_trait]
impl MessageRepository for InMemoryDatabase {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self.tables.read().messages.get(&id).cloned())
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.chats.contains_key(&message.chat_id) {
            return Err(DomainError::ChatNotFound(message.chat_id));
        }
        tables.messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn find_visible(
        &self,
        chat_id: Snowflake,
        viewer: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>> {
        let tables = self.tables.read();
        let cursor = match query.before {
            Some(id) => match tables.messages.get(&id) {
                Some(m) => Some(sort_key(m)),
                None => return Ok(Vec::new()),
            },
            None => None,
        };
        let mut rows: Vec<Message> = tables
            .visible_in_chat(chat_id, viewer)
            .into_iter()
            .filter(|m| cursor.map_or(true, |c| sort_key(m) < c))
            .collect();
        rows.sort_by_key(|m| std::cmp::Reverse(sort_key(m)));
        Ok(page(rows, 0, query.limit))
    }

    async fn find_replies(
        &self,
        parent_id: Snowflake,
        viewer: Snowflake,
    ) -> RepoResult<Vec<Message>> {
        let tables = self.tables.read();
        let mut rows: Vec<Message> = tables
            .messages
            .values()
            .filter(|m| m.reply_to == Some(parent_id) && tables.is_visible(m, viewer))
            .cloned()
            .collect();
        rows.sort_by_key(sort_key);
        Ok(rows)
    }

    async fn find_transcript(
        &self,
        chat_id: Snowflake,
        viewer: Snowflake,
        query: TranscriptQuery,
    ) -> RepoResult<Vec<Message>> {
        let tables = self.tables.read();
        let mut rows: Vec<Message> = tables
            .visible_in_chat(chat_id, viewer)
            .into_iter()
            .filter(|m| query.from.map_or(true, |from| m.created_at >= from))
            .filter(|m| query.to.map_or(true, |to| m.created_at <= to))
            .collect();
        rows.sort_by_key(sort_key);
        Ok(page(rows, query.offset, query.limit))
    }

    async fn is_hidden_for(&self, message_id: Snowflake, viewer: Snowflake) -> RepoResult<bool> {
        Ok(self.tables.read().deletions.contains(&(message_id, viewer)))
    }

    async fn delete_for_sender(
        &self,
        message_id: Snowflake,
        sender_id: Snowflake,
    ) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let message = tables
            .messages
            .get_mut(&message_id)
            .ok_or(DomainError::MessageNotFound(message_id))?;
        message.deleted_for_sender = true;
        tables.deletions.insert((message_id, sender_id));
        Ok(())
    }

    async fn delete_for_all(&self, message_id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let message = tables
            .messages
            .get_mut(&message_id)
            .ok_or(DomainError::MessageNotFound(message_id))?;
        message.deleted_for_all = true;
        Ok(())
    }

    async fn search(&self, search: MessageSearch<'_>) -> RepoResult<Vec<SearchHit>> {
        let tables = self.tables.read();
        let mut hits: Vec<SearchHit> = tables
            .messages
            .values()
            .filter(|m| search.chat_id.map_or(true, |chat_id| m.chat_id == chat_id))
            .filter(|m| tables.is_participant(m.chat_id, search.viewer))
            .filter(|m| tables.is_visible(m, search.viewer))
            .filter(|m| search.term.matches(&m.content))
            .map(|m| SearchHit {
                occurrences: i64::try_from(search.term.occurrences(&m.content)).unwrap_or(i64::MAX),
                message: m.clone(),
            })
            .collect();
        hits.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then_with(|| sort_key(&b.message).cmp(&sort_key(&a.message)))
        });
        Ok(page(hits, search.offset, search.limit))
    }
}

// ============================================================================
// Reactions
// ============================================================================

#[async_trait]
impl ReactionRepository for InMemoryDatabase {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reaction>> {
        Ok(self.tables.read().reactions.get(&id).cloned())
    }

    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Reaction>> {
        let mut rows: Vec<Reaction> = self
            .tables
            .read()
            .reactions
            .values()
            .filter(|r| r.message_id == message_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn create(&self, reaction: &Reaction) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.messages.contains_key(&reaction.message_id) {
            return Err(DomainError::MessageNotFound(reaction.message_id));
        }
        let taken = tables.reactions.values().any(|r| {
            r.message_id == reaction.message_id
                && r.user_id == reaction.user_id
                && r.emoji == reaction.emoji
        });
        if taken {
            return Err(DomainError::ReactionAlreadyExists);
        }
        tables.reactions.insert(reaction.id, reaction.clone());
        Ok(())
    }

    async fn update_emoji(&self, id: Snowflake, emoji: &str) -> RepoResult<Option<Reaction>> {
        let mut tables = self.tables.write();
        let Some(current) = tables.reactions.get(&id).cloned() else {
            return Ok(None);
        };
        let taken = tables.reactions.values().any(|r| {
            r.id != id
                && r.message_id == current.message_id
                && r.user_id == current.user_id
                && r.emoji == emoji
        });
        if taken {
            return Err(DomainError::ReactionAlreadyExists);
        }
        Ok(tables.reactions.get_mut(&id).map(|r| {
            r.emoji = emoji.to_string();
            r.clone()
        }))
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        Ok(self.tables.write().reactions.remove(&id).is_some())
    }
}

// ============================================================================
// Read markers
// ============================================================================

#[async_trait]
impl ReadMarkerRepository for InMemoryDatabase {
    async fn find(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ReadMarker>> {
        Ok(self
            .tables
            .read()
            .read_markers
            .iter()
            .find(|m| m.message_id == message_id && m.user_id == user_id)
            .cloned())
    }

    async fn create(&self, marker: &ReadMarker) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.messages.contains_key(&marker.message_id) {
            return Err(DomainError::MessageNotFound(marker.message_id));
        }
        if tables
            .read_markers
            .iter()
            .any(|m| m.message_id == marker.message_id && m.user_id == marker.user_id)
        {
            return Err(DomainError::ReadMarkerExists);
        }
        tables.read_markers.push(marker.clone());
        Ok(())
    }

    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<ReadMarker>> {
        Ok(self
            .tables
            .read()
            .read_markers
            .iter()
            .filter(|m| m.message_id == message_id)
            .cloned()
            .collect())
    }
}
