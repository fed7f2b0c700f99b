//! PostgreSQL implementation of MessageRepository
//!
//! Visibility for a viewer is "not deleted for all, and not hidden by the
//! viewer through `message_deletions`". Every listing applies it in SQL.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::Message;
use chat_core::traits::{
    MessageQuery, MessageRepository, MessageSearch, RepoResult, SearchHit, TranscriptQuery,
};
use chat_core::value_objects::Snowflake;

use crate::mappers::MessageInsert;
use crate::models::{MessageModel, SearchHitModel};

use super::error::map_db_error;

const MESSAGE_COLUMNS: &str = "m.id, m.chat_id, m.sender_id, m.content, m.message_type, \
     m.blob_ref, m.reply_to, m.forwarded_from, m.deleted_for_sender, m.deleted_for_all, \
     m.created_at";

/// Visibility predicate; `$viewer` is substituted with the bind position
fn visible_to(viewer_param: &str) -> String {
    format!(
        "m.deleted_for_all = FALSE AND NOT EXISTS (\
             SELECT 1 FROM message_deletions d \
             WHERE d.message_id = m.id AND d.user_id = {viewer_param})"
    )
}

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        let insert = MessageInsert::new(message);

        sqlx::query(
            r"
            INSERT INTO messages (id, chat_id, sender_id, content, message_type, blob_ref,
                                  reply_to, forwarded_from, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(insert.id)
        .bind(insert.chat_id)
        .bind(insert.sender_id)
        .bind(insert.content)
        .bind(insert.message_type)
        .bind(insert.blob_ref)
        .bind(insert.reply_to)
        .bind(insert.forwarded_from)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_visible(
        &self,
        chat_id: Snowflake,
        viewer: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>> {
        let limit = query.limit.clamp(1, 100);

        // An unknown `before` id makes the row comparison NULL, which yields
        // an empty page rather than the newest messages.
        let results = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m \
             WHERE m.chat_id = $1 AND {visible} \
               AND ($3::BIGINT IS NULL OR (m.created_at, m.id) < ( \
                   SELECT b.created_at, b.id FROM messages b WHERE b.id = $3)) \
             ORDER BY m.created_at DESC, m.id DESC \
             LIMIT $4",
            visible = visible_to("$2"),
        ))
        .bind(chat_id.into_inner())
        .bind(viewer.into_inner())
        .bind(query.before.map(Snowflake::into_inner))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_replies(
        &self,
        parent_id: Snowflake,
        viewer: Snowflake,
    ) -> RepoResult<Vec<Message>> {
        let results = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m \
             WHERE m.reply_to = $1 AND {visible} \
             ORDER BY m.created_at ASC, m.id ASC",
            visible = visible_to("$2"),
        ))
        .bind(parent_id.into_inner())
        .bind(viewer.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_transcript(
        &self,
        chat_id: Snowflake,
        viewer: Snowflake,
        query: TranscriptQuery,
    ) -> RepoResult<Vec<Message>> {
        let results = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m \
             WHERE m.chat_id = $1 AND {visible} \
               AND ($3::TIMESTAMPTZ IS NULL OR m.created_at >= $3) \
               AND ($4::TIMESTAMPTZ IS NULL OR m.created_at <= $4) \
             ORDER BY m.created_at ASC, m.id ASC \
             OFFSET $5 LIMIT $6",
            visible = visible_to("$2"),
        ))
        .bind(chat_id.into_inner())
        .bind(viewer.into_inner())
        .bind(query.from)
        .bind(query.to)
        .bind(query.offset.max(0))
        .bind(query.limit.max(1))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn is_hidden_for(&self, message_id: Snowflake, viewer: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM message_deletions WHERE message_id = $1 AND user_id = $2
            )
            ",
        )
        .bind(message_id.into_inner())
        .bind(viewer.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn delete_for_sender(
        &self,
        message_id: Snowflake,
        sender_id: Snowflake,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            UPDATE messages SET deleted_for_sender = TRUE
            WHERE id = $1 AND sender_id = $2
            ",
        )
        .bind(message_id.into_inner())
        .bind(sender_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO message_deletions (message_id, user_id, deleted_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (message_id, user_id) DO NOTHING
            ",
        )
        .bind(message_id.into_inner())
        .bind(sender_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_for_all(&self, message_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE messages SET deleted_for_all = TRUE WHERE id = $1
            ",
        )
        .bind(message_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, search), fields(viewer = %search.viewer, chat_id = ?search.chat_id))]
    async fn search(&self, search: MessageSearch<'_>) -> RepoResult<Vec<SearchHit>> {
        // Occurrences: removing every match shortens the lowered content by
        // `count * len(term)` characters.
        let results = sqlx::query_as::<_, SearchHitModel>(&format!(
            "SELECT {MESSAGE_COLUMNS}, \
                    ((CHAR_LENGTH(LOWER(m.content)) \
                      - CHAR_LENGTH(REPLACE(LOWER(m.content), LOWER($2), ''))) \
                     / CHAR_LENGTH($2))::BIGINT AS occurrences \
             FROM messages m \
             INNER JOIN chat_participants p ON p.chat_id = m.chat_id AND p.user_id = $1 \
             WHERE m.content ILIKE $3 ESCAPE '\\' AND {visible} \
               AND ($4::BIGINT IS NULL OR m.chat_id = $4) \
             ORDER BY occurrences DESC, m.created_at DESC, m.id DESC \
             OFFSET $5 LIMIT $6",
            visible = visible_to("$1"),
        ))
        .bind(search.viewer.into_inner())
        .bind(search.term.as_str())
        .bind(search.term.like_pattern())
        .bind(search.chat_id.map(Snowflake::into_inner))
        .bind(search.offset.max(0))
        .bind(search.limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(SearchHit::from).collect())
    }
}
