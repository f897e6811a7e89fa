use sqlx::PgPool;

use crate::db::models::Category;

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
        .fetch_all(pool)
        .await
}

pub(crate) async fn exists(
    executor: impl sqlx::PgExecutor<'_>,
    category_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(category_id)
        .fetch_one(executor)
        .await
}

pub(crate) async fn find_for_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT cat.id, cat.name
         FROM course_categories cc
         JOIN categories cat ON cat.id = cc.category_id
         WHERE cc.course_id = $1",
    )
    .bind(course_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn link_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    category_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO course_categories (course_id, category_id)
         VALUES ($1, $2)
         ON CONFLICT (course_id) DO UPDATE SET category_id = EXCLUDED.category_id",
    )
    .bind(course_id)
    .bind(category_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn unlink_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM course_categories WHERE course_id = $1")
        .bind(course_id)
        .execute(executor)
        .await?;
    Ok(())
}
