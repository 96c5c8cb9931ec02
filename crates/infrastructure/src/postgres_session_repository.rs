use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use assetdesk_application::SessionRepository;
use assetdesk_core::{AppResult, UserIdentity};

use crate::store_errors::store_error;

/// PostgreSQL-backed lookup of active user sessions.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SessionIdentityRow {
    user_id: Uuid,
    display_name: String,
    email: Option<String>,
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn find_identity_by_token_hash(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<UserIdentity>> {
        let row = sqlx::query_as::<_, SessionIdentityRow>(
            r#"
            SELECT users.id AS user_id, users.display_name, users.email
            FROM user_sessions AS sessions
            INNER JOIN users
                ON users.id = sessions.user_id
            WHERE sessions.token_hash = $1
                AND sessions.expires_at > now()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error("resolve session", error))?;

        Ok(row.map(|row| UserIdentity::new(row.user_id, row.display_name, row.email)))
    }
}
