//! Server-side login sessions keyed by an opaque cookie token.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use time::Duration;

use crate::core::security;
use crate::core::time::primitive_now_utc;
use crate::repositories;

#[derive(Debug, Clone)]
pub(crate) struct SessionData {
    pub(crate) user_id: String,
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("session storage failed: {0}")]
    Storage(#[from] sqlx::Error),
}

#[async_trait]
pub(crate) trait SessionStore: Send + Sync {
    /// Persists a new session and returns the raw token to hand to the client.
    async fn create(&self, user_id: &str) -> Result<String, SessionError>;

    /// Resolves a token to its session; expired or unknown tokens yield `None`.
    async fn load(&self, token: &str) -> Result<Option<SessionData>, SessionError>;

    /// Removes the session. Unknown tokens are ignored.
    async fn destroy(&self, token: &str) -> Result<(), SessionError>;

    async fn purge_expired(&self) -> Result<u64, SessionError>;
}

#[derive(Clone)]
pub(crate) struct PgSessionStore {
    pool: PgPool,
    ttl: Duration,
}

impl PgSessionStore {
    pub(crate) fn new(pool: PgPool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, user_id: &str) -> Result<String, SessionError> {
        let token = security::generate_session_token();
        let now = primitive_now_utc();

        repositories::sessions::create(
            &self.pool,
            repositories::sessions::CreateSession {
                token_hash: &security::hash_session_token(&token),
                user_id,
                created_at: now,
                expires_at: now + self.ttl,
            },
        )
        .await?;

        Ok(token)
    }

    async fn load(&self, token: &str) -> Result<Option<SessionData>, SessionError> {
        let user_id = repositories::sessions::find_active_user_id(
            &self.pool,
            &security::hash_session_token(token),
            primitive_now_utc(),
        )
        .await?;

        Ok(user_id.map(|user_id| SessionData { user_id }))
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        repositories::sessions::delete(&self.pool, &security::hash_session_token(token)).await?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, SessionError> {
        let removed = repositories::sessions::delete_expired(&self.pool, primitive_now_utc()).await?;
        Ok(removed)
    }
}
