use crate::db::models::Section;

const COLUMNS: &str = "id, course_id, position, title, video_url";

pub(crate) async fn insert(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    position: i32,
    title: &str,
    video_url: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO sections (course_id, position, title, video_url) VALUES ($1, $2, $3, $4)",
    )
    .bind(course_id)
    .bind(position)
    .bind(title)
    .bind(video_url)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn delete_for_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sections WHERE course_id = $1")
        .bind(course_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub(crate) async fn list_for_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<Vec<Section>, sqlx::Error> {
    sqlx::query_as::<_, Section>(&format!(
        "SELECT {COLUMNS} FROM sections WHERE course_id = $1 ORDER BY position, id"
    ))
    .bind(course_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn find_in_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    section_id: i64,
) -> Result<Option<Section>, sqlx::Error> {
    sqlx::query_as::<_, Section>(&format!(
        "SELECT {COLUMNS} FROM sections WHERE id = $1 AND course_id = $2"
    ))
    .bind(section_id)
    .bind(course_id)
    .fetch_optional(executor)
    .await
}
