/// Dashboard session model and database operations
///
/// A session row binds the SHA-256 hash of an opaque cookie value to an
/// account until `expires_at`. The plaintext cookie value is never stored.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     token_hash TEXT PRIMARY KEY,
///     account_id UUID NOT NULL REFERENCES accounts (id) ON DELETE CASCADE,
///     expires_at TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Session row
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Session {
    /// Hex SHA-256 of the cookie value
    pub token_hash: String,

    /// Owning account
    pub account_id: Uuid,

    /// Absolute expiry
    pub expires_at: DateTime<Utc>,

    /// When the session was opened
    pub created_at: DateTime<Utc>,
}

/// Input for opening a session
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Hex SHA-256 of the cookie value
    pub token_hash: String,

    /// Owning account
    pub account_id: Uuid,

    /// Absolute expiry
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is past its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Inserts a session
    pub async fn create(pool: &PgPool, data: NewSession) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token_hash, account_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token_hash, account_id, expires_at, created_at
            "#,
        )
        .bind(data.token_hash)
        .bind(data.account_id)
        .bind(data.expires_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds a session by token hash, expired or not
    pub async fn find_by_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT token_hash, account_id, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Deletes a session, returning whether it existed
    pub async fn delete_by_hash(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every expired session
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
