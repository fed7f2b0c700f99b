//! PostgreSQL implementation of ParticipantRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::Participant;
use chat_core::error::DomainError;
use chat_core::traits::{ParticipantRepository, RepoResult};
use chat_core::value_objects::Snowflake;

use crate::models::ParticipantModel;

use super::error::{id_array, map_db_error, map_foreign_key_violation};

const PARTICIPANT_COLUMNS: &str =
    "chat_id, user_id, joined_at, archived, muted, muted_until, pinned";

/// PostgreSQL implementation of ParticipantRepository
#[derive(Clone)]
pub struct PgParticipantRepository {
    pool: PgPool,
}

impl PgParticipantRepository {
    /// Create a new PgParticipantRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PgParticipantRepository {
    #[instrument(skip(self))]
    async fn is_participant(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM chat_participants WHERE chat_id = $1 AND user_id = $2
            )
            ",
        )
        .bind(chat_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Participant>> {
        let result = sqlx::query_as::<_, ParticipantModel>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM chat_participants WHERE chat_id = $1 AND user_id = $2"
        ))
        .bind(chat_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Participant::from))
    }

    #[instrument(skip(self))]
    async fn find_by_chat(&self, chat_id: Snowflake) -> RepoResult<Vec<Participant>> {
        let results = sqlx::query_as::<_, ParticipantModel>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM chat_participants WHERE chat_id = $1 \
             ORDER BY joined_at, user_id"
        ))
        .bind(chat_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Participant::from).collect())
    }

    #[instrument(skip(self))]
    async fn participant_ids(&self, chat_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let results = sqlx::query_scalar::<_, i64>(
            r"
            SELECT user_id FROM chat_participants
            WHERE chat_id = $1
            ORDER BY joined_at, user_id
            ",
        )
        .bind(chat_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn add(&self, chat_id: Snowflake, user_ids: &[Snowflake]) -> RepoResult<Vec<Participant>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_as::<_, ParticipantModel>(&format!(
            "INSERT INTO chat_participants (chat_id, user_id, joined_at) \
             SELECT $1, u, NOW() FROM UNNEST($2::BIGINT[]) AS u \
             ON CONFLICT (chat_id, user_id) DO NOTHING \
             RETURNING {PARTICIPANT_COLUMNS}"
        ))
        .bind(chat_id.into_inner())
        .bind(id_array(user_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, || {
                DomainError::InvalidParticipants("unknown user".to_string())
            })
        })?;

        Ok(results.into_iter().map(Participant::from).collect())
    }

    #[instrument(skip(self))]
    async fn remove(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM chat_participants WHERE chat_id = $1 AND user_id = $2
            ",
        )
        .bind(chat_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn set_archived(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        archived: bool,
    ) -> RepoResult<Option<Participant>> {
        let result = sqlx::query_as::<_, ParticipantModel>(&format!(
            "UPDATE chat_participants SET archived = $3 \
             WHERE chat_id = $1 AND user_id = $2 \
             RETURNING {PARTICIPANT_COLUMNS}"
        ))
        .bind(chat_id.into_inner())
        .bind(user_id.into_inner())
        .bind(archived)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Participant::from))
    }

    #[instrument(skip(self))]
    async fn set_muted(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        muted: bool,
        until: Option<DateTime<Utc>>,
    ) -> RepoResult<Option<Participant>> {
        // Unmuting always clears the stored end time
        let until = if muted { until } else { None };

        let result = sqlx::query_as::<_, ParticipantModel>(&format!(
            "UPDATE chat_participants SET muted = $3, muted_until = $4 \
             WHERE chat_id = $1 AND user_id = $2 \
             RETURNING {PARTICIPANT_COLUMNS}"
        ))
        .bind(chat_id.into_inner())
        .bind(user_id.into_inner())
        .bind(muted)
        .bind(until)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Participant::from))
    }

    #[instrument(skip(self))]
    async fn set_pinned(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        pinned: bool,
        max_pinned: usize,
    ) -> RepoResult<Option<Participant>> {
        if !pinned {
            let result = sqlx::query_as::<_, ParticipantModel>(&format!(
                "UPDATE chat_participants SET pinned = FALSE \
                 WHERE chat_id = $1 AND user_id = $2 \
                 RETURNING {PARTICIPANT_COLUMNS}"
            ))
            .bind(chat_id.into_inner())
            .bind(user_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            return Ok(result.map(Participant::from));
        }

        // Serialize pin attempts per user so two concurrent pins cannot both
        // pass the count check.
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let result = sqlx::query_as::<_, ParticipantModel>(&format!(
            "UPDATE chat_participants p SET pinned = TRUE \
             WHERE p.chat_id = $1 AND p.user_id = $2 \
               AND (p.pinned OR ( \
                   SELECT COUNT(*) FROM chat_participants o \
                   WHERE o.user_id = $2 AND o.pinned \
               ) < $3) \
             RETURNING {PARTICIPANT_COLUMNS}"
        ))
        .bind(chat_id.into_inner())
        .bind(user_id.into_inner())
        .bind(max_pinned as i64)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let outcome = match result {
            Some(model) => Ok(Some(Participant::from(model))),
            None => {
                let exists = sqlx::query_scalar::<_, bool>(
                    r"
                    SELECT EXISTS(
                        SELECT 1 FROM chat_participants WHERE chat_id = $1 AND user_id = $2
                    )
                    ",
                )
                .bind(chat_id.into_inner())
                .bind(user_id.into_inner())
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error)?;

                if exists {
                    Err(DomainError::PinLimitReached { max: max_pinned })
                } else {
                    Ok(None)
                }
            }
        };

        tx.commit().await.map_err(map_db_error)?;

        outcome
    }
}
