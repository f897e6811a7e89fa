use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Rating;

const COLUMNS: &str = "id, user_id, course_id, rating, comment, created_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RatingWithAuthorRow {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) rating: i32,
    pub(crate) comment: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
}

pub(crate) struct CreateRating<'a> {
    pub(crate) id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) rating: i32,
    pub(crate) comment: Option<&'a str>,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) async fn exists(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM ratings WHERE user_id = $1 AND course_id = $2)",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateRating<'_>,
) -> Result<Rating, sqlx::Error> {
    sqlx::query_as::<_, Rating>(&format!(
        "INSERT INTO ratings (id, user_id, course_id, rating, comment, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.course_id)
    .bind(params.rating)
    .bind(params.comment)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

/// Returns (raw average, count); the average is 0 when there are no ratings.
pub(crate) async fn aggregate(pool: &PgPool, course_id: &str) -> Result<(f64, i64), sqlx::Error> {
    sqlx::query_as::<_, (f64, i64)>(
        "SELECT COALESCE(AVG(rating)::float8, 0), COUNT(*)
         FROM ratings
         WHERE course_id = $1",
    )
    .bind(course_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_for_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<RatingWithAuthorRow>, sqlx::Error> {
    sqlx::query_as::<_, RatingWithAuthorRow>(
        "SELECT r.id, r.user_id, r.rating, r.comment, r.created_at, u.first_name, u.last_name
         FROM ratings r
         JOIN users u ON u.id = r.user_id
         WHERE r.course_id = $1
         ORDER BY r.created_at DESC, r.id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}
