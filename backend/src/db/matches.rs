use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::store::MatchStore;
use crate::error::StoreError;
use crate::models::{CanonicalPair, Match};

const MATCH_COLUMNS: &str = "id, user_a, user_b, initiated_by, is_mutual, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict,
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
            StoreError::Rejected(db_err.message().to_string())
        }
        _ => StoreError::Unavailable(err.to_string()),
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn find_match(&self, pair: &CanonicalPair) -> Result<Option<Match>, StoreError> {
        let query = format!(
            "SELECT {} FROM matches WHERE user_a = $1 AND user_b = $2",
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(pair.user_a())
            .bind(pair.user_b())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn create_match(&self, pair: &CanonicalPair, initiated_by: &str) -> Result<Match, StoreError> {
        let query = format!(
            r#"
            INSERT INTO matches (user_a, user_b, initiated_by)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(pair.user_a())
            .bind(pair.user_b())
            .bind(initiated_by)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn mark_mutual(&self, record: &Match) -> Result<Match, StoreError> {
        let query = format!(
            r#"
            UPDATE matches
            SET is_mutual = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(record.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| StoreError::Unavailable(format!("match {} disappeared during update", record.id)))
    }

    async fn list_matches_for(&self, user_id: &str) -> Result<Vec<Match>, StoreError> {
        let query = format!(
            r#"
            SELECT {}
            FROM matches
            WHERE user_a = $1 OR user_b = $1
            ORDER BY updated_at DESC
            "#,
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
