use sqlx::PgPool;
use sqlx::{Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::Course;

pub(crate) const COLUMNS: &str =
    "id, name, description, creator_id, language, cover_image, created_at, updated_at";

/// Catalog listing row: the course plus its category and creator display name.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CourseListRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) creator_id: String,
    pub(crate) language: Option<String>,
    pub(crate) cover_image: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) category_name: Option<String>,
    pub(crate) creator_first_name: String,
    pub(crate) creator_last_name: String,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct CourseFilter {
    pub(crate) creator_id: Option<String>,
    pub(crate) category_id: Option<i64>,
    pub(crate) limit: Option<i64>,
}

pub(crate) struct CreateCourse<'a> {
    pub(crate) id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) creator_id: &'a str,
    pub(crate) language: Option<&'a str>,
    pub(crate) cover_image: Option<&'a str>,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) struct UpdateCourse<'a> {
    pub(crate) name: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) language: Option<&'a str>,
    pub(crate) cover_image: Option<&'a str>,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateCourse<'_>,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            id, name, description, creator_id, language, cover_image, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$7)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.description)
    .bind(params.creator_id)
    .bind(params.language)
    .bind(params.cover_image)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(executor)
        .await
}

/// Locks the course row for the rest of the transaction.
pub(crate) async fn find_for_update(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COLUMNS} FROM courses WHERE id = $1 FOR UPDATE"
    ))
    .bind(course_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn update(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    params: UpdateCourse<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET
            name = $1,
            description = $2,
            language = $3,
            cover_image = COALESCE($4, cover_image),
            updated_at = $5
         WHERE id = $6",
    )
    .bind(params.name)
    .bind(params.description)
    .bind(params.language)
    .bind(params.cover_image)
    .bind(params.updated_at)
    .bind(course_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(course_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: &CourseFilter,
) -> Result<Vec<CourseListRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT c.id,
                c.name,
                c.description,
                c.creator_id,
                c.language,
                c.cover_image,
                c.created_at,
                cat.name AS category_name,
                u.first_name AS creator_first_name,
                u.last_name AS creator_last_name
         FROM courses c
         JOIN users u ON u.id = c.creator_id
         LEFT JOIN course_categories cc ON cc.course_id = c.id
         LEFT JOIN categories cat ON cat.id = cc.category_id
         WHERE 1 = 1",
    );

    if let Some(creator_id) = filter.creator_id.as_deref() {
        builder.push(" AND c.creator_id = ");
        builder.push_bind(creator_id);
    }

    if let Some(category_id) = filter.category_id {
        builder.push(" AND cc.category_id = ");
        builder.push_bind(category_id);
    }

    builder.push(" ORDER BY c.created_at DESC, c.id");

    if let Some(limit) = filter.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit.clamp(1, 1000));
    }

    builder.build_query_as::<CourseListRow>().fetch_all(pool).await
}
