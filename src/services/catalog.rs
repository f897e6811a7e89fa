//! Teacher-owned course records and their requirements, sections and category.
//!
//! Every write runs in one transaction; child rows are replaced wholesale on edit.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{Category, Course, Requirement, Section};
use crate::repositories;
use crate::repositories::courses::{CourseFilter, CourseListRow};
use crate::services::errors::DomainError;

#[derive(Debug, Clone, Default)]
pub(crate) struct SectionDraft {
    pub(crate) title: String,
    pub(crate) video_url: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CourseDraft {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) language: Option<String>,
    pub(crate) cover_image: Option<String>,
    pub(crate) category_id: Option<i64>,
    pub(crate) requirements: Vec<String>,
    pub(crate) sections: Vec<SectionDraft>,
}

#[derive(Debug)]
pub(crate) struct CourseDetails {
    pub(crate) course: Course,
    pub(crate) category: Option<Category>,
    pub(crate) requirements: Vec<Requirement>,
    pub(crate) sections: Vec<Section>,
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Requirements that survive blank filtering, in submission order.
pub(crate) fn kept_requirements(draft: &CourseDraft) -> Vec<&str> {
    draft.requirements.iter().map(|item| item.trim()).filter(|item| !item.is_empty()).collect()
}

/// Sections need both a title and a video URL; anything else is dropped.
pub(crate) fn kept_sections(draft: &CourseDraft) -> Vec<(&str, &str)> {
    draft
        .sections
        .iter()
        .map(|section| (section.title.trim(), section.video_url.trim()))
        .filter(|(title, url)| !title.is_empty() && !url.is_empty())
        .collect()
}

fn validate_draft(draft: &CourseDraft) -> Result<(), DomainError> {
    if draft.name.trim().is_empty() {
        return Err(DomainError::Validation("Course name is required".to_string()));
    }
    Ok(())
}

async fn write_children(
    tx: &mut Transaction<'_, Postgres>,
    course_id: &str,
    draft: &CourseDraft,
) -> Result<(), DomainError> {
    match draft.category_id {
        Some(category_id) => {
            if !repositories::categories::exists(&mut **tx, category_id).await? {
                return Err(DomainError::Validation(format!("Unknown category {category_id}")));
            }
            repositories::categories::link_course(&mut **tx, course_id, category_id).await?;
        }
        None => repositories::categories::unlink_course(&mut **tx, course_id).await?,
    }

    for (index, text) in kept_requirements(draft).into_iter().enumerate() {
        repositories::requirements::insert(&mut **tx, course_id, index as i32 + 1, text).await?;
    }

    for (index, (title, video_url)) in kept_sections(draft).into_iter().enumerate() {
        repositories::sections::insert(&mut **tx, course_id, index as i32 + 1, title, video_url)
            .await?;
    }

    Ok(())
}

pub(crate) async fn create_course(
    pool: &PgPool,
    creator_id: &str,
    draft: &CourseDraft,
) -> Result<Course, DomainError> {
    validate_draft(draft)?;

    let course_id = Uuid::new_v4().to_string();
    let mut tx = pool.begin().await?;

    let course = repositories::courses::create(
        &mut *tx,
        repositories::courses::CreateCourse {
            id: &course_id,
            name: draft.name.trim(),
            description: trimmed(draft.description.as_deref()),
            creator_id,
            language: trimmed(draft.language.as_deref()),
            cover_image: trimmed(draft.cover_image.as_deref()),
            created_at: primitive_now_utc(),
        },
    )
    .await?;

    write_children(&mut tx, &course.id, draft).await?;
    tx.commit().await?;

    tracing::info!(user_id = creator_id, course_id = %course.id, action = "create_course", "Course created");
    Ok(course)
}

/// Loads a course for editing, enforcing that only its creator may touch it.
pub(crate) async fn find_owned_course(
    pool: &PgPool,
    course_id: &str,
    user_id: &str,
) -> Result<Course, DomainError> {
    let course = repositories::courses::find_by_id(pool, course_id)
        .await?
        .ok_or(DomainError::NotFound("Course"))?;
    if course.creator_id != user_id {
        return Err(DomainError::Forbidden("Only the course creator can manage this course"));
    }
    Ok(course)
}

pub(crate) async fn update_course(
    pool: &PgPool,
    course_id: &str,
    editor_id: &str,
    draft: &CourseDraft,
) -> Result<Course, DomainError> {
    validate_draft(draft)?;

    let mut tx = pool.begin().await?;
    let existing = repositories::courses::find_for_update(&mut *tx, course_id)
        .await?
        .ok_or(DomainError::NotFound("Course"))?;
    if existing.creator_id != editor_id {
        return Err(DomainError::Forbidden("Only the course creator can manage this course"));
    }

    repositories::courses::update(
        &mut *tx,
        course_id,
        repositories::courses::UpdateCourse {
            name: draft.name.trim(),
            description: trimmed(draft.description.as_deref()),
            language: trimmed(draft.language.as_deref()),
            cover_image: trimmed(draft.cover_image.as_deref()),
            updated_at: primitive_now_utc(),
        },
    )
    .await?;

    repositories::requirements::delete_for_course(&mut *tx, course_id).await?;
    repositories::sections::delete_for_course(&mut *tx, course_id).await?;
    write_children(&mut tx, course_id, draft).await?;

    let course = repositories::courses::find_by_id(&mut *tx, course_id)
        .await?
        .ok_or(DomainError::NotFound("Course"))?;
    tx.commit().await?;

    tracing::info!(user_id = editor_id, course_id, action = "update_course", "Course updated");
    Ok(course)
}

pub(crate) async fn delete_course(
    pool: &PgPool,
    course_id: &str,
    requester_id: &str,
) -> Result<(), DomainError> {
    let mut tx = pool.begin().await?;
    let course = repositories::courses::find_for_update(&mut *tx, course_id)
        .await?
        .ok_or(DomainError::NotFound("Course"))?;
    if course.creator_id != requester_id {
        tracing::warn!(user_id = requester_id, course_id, action = "delete_course", "Delete refused");
        return Err(DomainError::Forbidden("Only the course creator can delete this course"));
    }

    repositories::sections::delete_for_course(&mut *tx, course_id).await?;
    repositories::requirements::delete_for_course(&mut *tx, course_id).await?;
    repositories::categories::unlink_course(&mut *tx, course_id).await?;
    repositories::courses::delete_by_id(&mut *tx, course_id).await?;
    tx.commit().await?;

    tracing::info!(user_id = requester_id, course_id, action = "delete_course", "Course deleted");
    Ok(())
}

pub(crate) async fn list_courses(
    pool: &PgPool,
    filter: &CourseFilter,
) -> Result<Vec<CourseListRow>, DomainError> {
    Ok(repositories::courses::list(pool, filter).await?)
}

pub(crate) async fn get_course_details(
    pool: &PgPool,
    course_id: &str,
) -> Result<CourseDetails, DomainError> {
    let course = repositories::courses::find_by_id(pool, course_id)
        .await?
        .ok_or(DomainError::NotFound("Course"))?;
    let category = repositories::categories::find_for_course(pool, course_id).await?;
    let requirements = repositories::requirements::list_for_course(pool, course_id).await?;
    let sections = repositories::sections::list_for_course(pool, course_id).await?;

    Ok(CourseDetails { course, category, requirements, sections })
}

#[cfg(test)]
mod tests {
    use super::{
        create_course, delete_course, get_course_details, kept_requirements, kept_sections,
        update_course, CourseDraft, SectionDraft,
    };
    use crate::db::types::UserRole;
    use crate::services::errors::DomainError;
    use crate::test_support;

    fn draft() -> CourseDraft {
        CourseDraft {
            name: "Rust for Beginners".to_string(),
            description: Some("Ownership and borrowing".to_string()),
            language: Some("English".to_string()),
            cover_image: None,
            category_id: Some(1),
            requirements: vec!["A computer".to_string(), "  ".to_string(), "Curiosity".to_string()],
            sections: vec![
                SectionDraft {
                    title: "Intro".to_string(),
                    video_url: "https://youtu.be/abc123".to_string(),
                },
                SectionDraft { title: "".to_string(), video_url: "".to_string() },
                SectionDraft {
                    title: "Borrowing".to_string(),
                    video_url: "https://www.youtube.com/watch?v=def456".to_string(),
                },
            ],
        }
    }

    #[test]
    fn blank_children_are_skipped() {
        let draft = draft();
        assert_eq!(kept_requirements(&draft), vec!["A computer", "Curiosity"]);
        assert_eq!(kept_sections(&draft).len(), 2);
        assert_eq!(kept_sections(&draft)[1].0, "Borrowing");
    }

    #[tokio::test]
    async fn create_then_update_replaces_children() {
        let ctx = test_support::setup_test_context().await;
        let teacher = test_support::insert_user(
            ctx.state.db(),
            "teacher@example.com",
            UserRole::Teacher,
            "teacher-pass",
        )
        .await;

        let course = create_course(ctx.state.db(), &teacher.id, &draft()).await.expect("create");
        let details = get_course_details(ctx.state.db(), &course.id).await.expect("details");
        assert_eq!(details.requirements.len(), 2);
        assert_eq!(details.sections.len(), 2);
        assert_eq!(details.sections[0].position, 1);
        assert_eq!(details.category.map(|category| category.id), Some(1));

        let mut edited = draft();
        edited.name = "Rust, Second Edition".to_string();
        edited.category_id = None;
        edited.requirements = vec!["Patience".to_string()];
        edited.sections.truncate(1);
        update_course(ctx.state.db(), &course.id, &teacher.id, &edited).await.expect("update");

        let details = get_course_details(ctx.state.db(), &course.id).await.expect("details");
        assert_eq!(details.course.name, "Rust, Second Edition");
        assert!(details.category.is_none());
        assert_eq!(details.requirements.len(), 1);
        assert_eq!(details.requirements[0].requirement_text, "Patience");
        assert_eq!(details.sections.len(), 1);
    }

    #[tokio::test]
    async fn unknown_category_rolls_back_the_whole_create() {
        let ctx = test_support::setup_test_context().await;
        let teacher = test_support::insert_user(
            ctx.state.db(),
            "rollback@example.com",
            UserRole::Teacher,
            "teacher-pass",
        )
        .await;

        let mut bad = draft();
        bad.category_id = Some(9_999);
        let err = create_course(ctx.state.db(), &teacher.id, &bad).await.expect_err("bad category");
        assert!(matches!(err, DomainError::Validation(_)));

        let courses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(ctx.state.db())
            .await
            .expect("count courses");
        assert_eq!(courses, 0);
    }

    #[tokio::test]
    async fn delete_is_creator_only_and_leaves_no_orphans() {
        let ctx = test_support::setup_test_context().await;
        let owner = test_support::insert_user(
            ctx.state.db(),
            "owner@example.com",
            UserRole::Teacher,
            "owner-pass",
        )
        .await;
        let other = test_support::insert_user(
            ctx.state.db(),
            "other@example.com",
            UserRole::Teacher,
            "other-pass",
        )
        .await;
        let course = create_course(ctx.state.db(), &owner.id, &draft()).await.expect("create");

        let refused = delete_course(ctx.state.db(), &course.id, &other.id).await;
        assert!(matches!(refused, Err(DomainError::Forbidden(_))));

        delete_course(ctx.state.db(), &course.id, &owner.id).await.expect("delete");

        for table in ["sections", "requirements", "course_categories", "courses"] {
            let remaining: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(ctx.state.db())
                .await
                .expect("count rows");
            assert_eq!(remaining, 0, "{table} should be empty");
        }

        let missing = delete_course(ctx.state.db(), &course.id, &owner.id).await;
        assert!(matches!(missing, Err(DomainError::NotFound("Course"))));
    }
}
