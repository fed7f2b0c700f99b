//! PostgreSQL implementation of ChatRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::{Chat, Participant};
use chat_core::error::DomainError;
use chat_core::traits::{ChatRepository, RepoResult};
use chat_core::value_objects::Snowflake;

use crate::models::{ChatModel, ChatWithStateModel};

use super::error::{id_array, map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of ChatRepository
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    /// Create a new PgChatRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>> {
        let result = sqlx::query_as::<_, ChatModel>(
            r"
            SELECT id, kind, name, avatar, creator_id, created_at, last_activity_at
            FROM chats
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Chat::from))
    }

    #[instrument(skip(self))]
    async fn find_private_between(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Chat>> {
        let result = sqlx::query_as::<_, ChatModel>(
            r"
            SELECT c.id, c.kind, c.name, c.avatar, c.creator_id, c.created_at, c.last_activity_at
            FROM chats c
            WHERE c.kind = 0
              AND EXISTS (SELECT 1 FROM chat_participants p WHERE p.chat_id = c.id AND p.user_id = $1)
              AND EXISTS (SELECT 1 FROM chat_participants p WHERE p.chat_id = c.id AND p.user_id = $2)
            ORDER BY c.id
            LIMIT 1
            ",
        )
        .bind(user_a.into_inner())
        .bind(user_b.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Chat::from))
    }

    #[instrument(skip(self))]
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<(Chat, Participant)>> {
        let results = sqlx::query_as::<_, ChatWithStateModel>(
            r"
            SELECT c.id, c.kind, c.name, c.avatar, c.creator_id, c.created_at, c.last_activity_at,
                   p.user_id, p.joined_at, p.archived, p.muted, p.muted_until, p.pinned
            FROM chats c
            INNER JOIN chat_participants p ON p.chat_id = c.id
            WHERE p.user_id = $1
            ORDER BY p.pinned DESC, c.last_activity_at DESC, c.id DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(<(Chat, Participant)>::from).collect())
    }

    #[instrument(skip(self, chat), fields(chat_id = %chat.id))]
    async fn create(&self, chat: &Chat, participant_ids: &[Snowflake]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO chats (id, kind, name, avatar, creator_id, created_at, last_activity_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(chat.id.into_inner())
        .bind(chat.kind.as_i16())
        .bind(chat.name.as_deref())
        .bind(chat.avatar.as_deref())
        .bind(chat.creator_id.into_inner())
        .bind(chat.created_at)
        .bind(chat.last_activity_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::UserNotFound(chat.creator_id)))?;

        sqlx::query(
            r"
            INSERT INTO chat_participants (chat_id, user_id, joined_at)
            SELECT $1, u, $3 FROM UNNEST($2::BIGINT[]) AS u
            ON CONFLICT (chat_id, user_id) DO NOTHING
            ",
        )
        .bind(chat.id.into_inner())
        .bind(id_array(participant_ids))
        .bind(chat.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, || {
                DomainError::InvalidParticipants("unknown user".to_string())
            })
        })?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn touch(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE chats
            SET last_activity_at = GREATEST(last_activity_at, $2)
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
