use time::PrimitiveDateTime;

use crate::db::models::CourseProgress;

const COLUMNS: &str = "id, user_id, course_id, progress, last_viewed_section, updated_at";

pub(crate) struct UpsertProgress<'a> {
    pub(crate) id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) progress: i32,
    pub(crate) last_viewed_section: Option<i64>,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn find(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    course_id: &str,
) -> Result<Option<CourseProgress>, sqlx::Error> {
    sqlx::query_as::<_, CourseProgress>(&format!(
        "SELECT {COLUMNS} FROM course_progress WHERE user_id = $1 AND course_id = $2"
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(executor)
    .await
}

/// Inserts the row or overwrites progress and position of the existing one.
/// The id only applies on insert.
pub(crate) async fn upsert(
    executor: impl sqlx::PgExecutor<'_>,
    params: UpsertProgress<'_>,
) -> Result<CourseProgress, sqlx::Error> {
    sqlx::query_as::<_, CourseProgress>(&format!(
        "INSERT INTO course_progress (
            id, user_id, course_id, progress, last_viewed_section, updated_at
         ) VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (user_id, course_id)
         DO UPDATE SET progress = EXCLUDED.progress,
                       last_viewed_section = EXCLUDED.last_viewed_section,
                       updated_at = EXCLUDED.updated_at
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.course_id)
    .bind(params.progress)
    .bind(params.last_viewed_section)
    .bind(params.updated_at)
    .fetch_one(executor)
    .await
}
