use sqlx::PgPool;

use crate::db::models::UserLink;

pub(crate) async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<UserLink>, sqlx::Error> {
    sqlx::query_as::<_, UserLink>(
        "SELECT id, user_id, link_name, link_url FROM user_links WHERE user_id = $1 ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn exists(
    pool: &PgPool,
    user_id: &str,
    link_name: &str,
    link_url: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM user_links WHERE user_id = $1 AND link_name = $2 AND link_url = $3
         )",
    )
    .bind(user_id)
    .bind(link_name)
    .bind(link_url)
    .fetch_one(pool)
    .await
}

pub(crate) async fn create(
    pool: &PgPool,
    user_id: &str,
    link_name: &str,
    link_url: &str,
) -> Result<UserLink, sqlx::Error> {
    sqlx::query_as::<_, UserLink>(
        "INSERT INTO user_links (user_id, link_name, link_url)
         VALUES ($1,$2,$3)
         RETURNING id, user_id, link_name, link_url",
    )
    .bind(user_id)
    .bind(link_name)
    .bind(link_url)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    link_id: i64,
    user_id: &str,
    link_name: &str,
    link_url: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE user_links SET link_name = $1, link_url = $2 WHERE id = $3 AND user_id = $4",
    )
    .bind(link_name)
    .bind(link_url)
    .bind(link_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete(pool: &PgPool, link_id: i64, user_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM user_links WHERE id = $1 AND user_id = $2")
        .bind(link_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
