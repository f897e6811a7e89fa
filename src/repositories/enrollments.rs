use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Enrollment;
use crate::db::types::EnrollmentStatus;

const COLUMNS: &str = "id, user_id, course_id, enrolled_at, progress, status";

/// Profile view row: one enrolled course with its progress.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EnrolledCourseRow {
    pub(crate) course_id: String,
    pub(crate) course_name: String,
    pub(crate) progress: i32,
    pub(crate) status: EnrollmentStatus,
    pub(crate) enrolled_at: PrimitiveDateTime,
}

pub(crate) struct CreateEnrollment<'a> {
    pub(crate) id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) enrolled_at: PrimitiveDateTime,
}

pub(crate) async fn find(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2"
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateEnrollment<'_>,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (id, user_id, course_id, enrolled_at, progress, status)
         VALUES ($1, $2, $3, $4, 0, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.course_id)
    .bind(params.enrolled_at)
    .bind(EnrollmentStatus::Enrolled)
    .fetch_one(executor)
    .await
}

pub(crate) async fn set_progress(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    course_id: &str,
    progress: i32,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE enrollments SET progress = $1 WHERE user_id = $2 AND course_id = $3")
            .bind(progress)
            .bind(user_id)
            .bind(course_id)
            .execute(executor)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<EnrolledCourseRow>, sqlx::Error> {
    sqlx::query_as::<_, EnrolledCourseRow>(
        "SELECT e.course_id,
                c.name AS course_name,
                e.progress,
                e.status,
                e.enrolled_at
         FROM enrollments e
         JOIN courses c ON c.id = e.course_id
         WHERE e.user_id = $1
         ORDER BY e.enrolled_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
