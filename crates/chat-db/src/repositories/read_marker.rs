//! PostgreSQL implementation of ReadMarkerRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::ReadMarker;
use chat_core::error::DomainError;
use chat_core::traits::{ReadMarkerRepository, RepoResult};
use chat_core::value_objects::Snowflake;

use crate::models::ReadMarkerModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ReadMarkerRepository
#[derive(Clone)]
pub struct PgReadMarkerRepository {
    pool: PgPool,
}

impl PgReadMarkerRepository {
    /// Create a new PgReadMarkerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadMarkerRepository for PgReadMarkerRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ReadMarker>> {
        let result = sqlx::query_as::<_, ReadMarkerModel>(
            r"
            SELECT message_id, user_id, read_at
            FROM read_markers
            WHERE message_id = $1 AND user_id = $2
            ",
        )
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ReadMarker::from))
    }

    #[instrument(skip(self))]
    async fn create(&self, marker: &ReadMarker) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO read_markers (message_id, user_id, read_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(marker.message_id.into_inner())
        .bind(marker.user_id.into_inner())
        .bind(marker.read_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReadMarkerExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<ReadMarker>> {
        let results = sqlx::query_as::<_, ReadMarkerModel>(
            r"
            SELECT message_id, user_id, read_at
            FROM read_markers
            WHERE message_id = $1
            ORDER BY read_at, user_id
            ",
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ReadMarker::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgReadMarkerRepository>();
    }
}
