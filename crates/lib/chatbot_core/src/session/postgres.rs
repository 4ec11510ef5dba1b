//! PostgreSQL session store.
//!
//! Each session is one row of the `sessions` table; the turn list is kept as
//! a single JSONB array so a conversation reads and writes as one document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::{Session, SessionId, SessionStore, StoreError, Turn};

/// Row returned by session queries.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    messages: Json<Vec<Turn>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            id: SessionId::from(row.id),
            turns: row.messages.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// [`SessionStore`] backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self) -> Result<Session, StoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (id, messages)
            VALUES ($1, '[]'::jsonb)
            RETURNING id, messages, created_at, updated_at
            "#,
        )
        .bind(SessionId::generate().as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, messages, created_at, updated_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Session::from))
    }

    async fn save_turns(
        &self,
        id: &SessionId,
        turns: &[Turn],
    ) -> Result<DateTime<Utc>, StoreError> {
        let updated_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            UPDATE sessions
            SET messages = $2, updated_at = now()
            WHERE id = $1
            RETURNING updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(turns))
        .fetch_optional(&self.pool)
        .await?;

        updated_at.ok_or(StoreError::Missing(*id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
