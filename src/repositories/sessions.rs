use sqlx::PgPool;

pub(crate) struct CreateSession<'a> {
    pub(crate) token_hash: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) expires_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, session: CreateSession<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO user_sessions (token_hash, user_id, created_at, expires_at)
         VALUES ($1,$2,$3,$4)",
    )
    .bind(session.token_hash)
    .bind(session.user_id)
    .bind(session.created_at)
    .bind(session.expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// User id behind an unexpired session.
pub(crate) async fn find_active_user_id(
    pool: &PgPool,
    token_hash: &str,
    now: time::PrimitiveDateTime,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT user_id FROM user_sessions WHERE token_hash = $1 AND expires_at > $2")
    .bind(token_hash)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM user_sessions WHERE token_hash = $1")
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete_expired(
    pool: &PgPool,
    now: time::PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at <= $1")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
