use crate::db::models::Requirement;

pub(crate) async fn insert(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    position: i32,
    requirement_text: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO requirements (course_id, position, requirement_text) VALUES ($1, $2, $3)",
    )
    .bind(course_id)
    .bind(position)
    .bind(requirement_text)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn delete_for_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM requirements WHERE course_id = $1")
        .bind(course_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub(crate) async fn list_for_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<Vec<Requirement>, sqlx::Error> {
    sqlx::query_as::<_, Requirement>(
        "SELECT id, course_id, position, requirement_text
         FROM requirements
         WHERE course_id = $1
         ORDER BY position, id",
    )
    .bind(course_id)
    .fetch_all(executor)
    .await
}
