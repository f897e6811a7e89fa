//! Enrollment and progress bookkeeping for a (user, course) pair.
//!
//! `enrollments.progress` mirrors `course_progress.progress`; both are written
//! in the same transaction.

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{Enrollment, Section};
use crate::repositories;
use crate::services::errors::DomainError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct ProgressUpdate<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) last_viewed_section: Option<i64>,
    pub(crate) completed: i64,
    pub(crate) total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProgressSnapshot {
    pub(crate) progress: i32,
    pub(crate) last_viewed_section: Option<i64>,
}

pub(crate) fn player_url(course_id: &str) -> String {
    format!("/course_player/{course_id}")
}

/// Whole-percent completion, rounded down.
pub(crate) fn compute_progress(completed: i64, total: i64) -> Result<i32, DomainError> {
    if total <= 0 {
        return Err(DomainError::Validation("totalSections must be greater than zero".to_string()));
    }
    if completed < 0 {
        return Err(DomainError::Validation("completedSections cannot be negative".to_string()));
    }
    if completed > total {
        return Err(DomainError::Validation(
            "completedSections cannot exceed totalSections".to_string(),
        ));
    }
    // Widened so request-supplied counts near i64::MAX cannot overflow.
    let percent = i128::from(completed) * 100 / i128::from(total);
    Ok(percent as i32)
}

/// The section to resume from: the last viewed one if it still exists, else the first.
pub(crate) fn resolve_current_section(
    last_viewed: Option<i64>,
    sections: &[Section],
) -> Option<&Section> {
    last_viewed
        .and_then(|id| sections.iter().find(|section| section.id == id))
        .or_else(|| sections.first())
}

pub(crate) async fn enroll(
    pool: &PgPool,
    user_id: &str,
    course_id: &str,
) -> Result<Enrollment, DomainError> {
    let mut tx = pool.begin().await?;

    if repositories::courses::find_by_id(&mut *tx, course_id).await?.is_none() {
        return Err(DomainError::NotFound("Course"));
    }
    if repositories::enrollments::find(&mut *tx, user_id, course_id).await?.is_some() {
        return Err(DomainError::AlreadyEnrolled);
    }

    let now = primitive_now_utc();
    let enrollment_id = Uuid::new_v4().to_string();
    let enrollment = repositories::enrollments::create(
        &mut *tx,
        repositories::enrollments::CreateEnrollment {
            id: &enrollment_id,
            user_id,
            course_id,
            enrolled_at: now,
        },
    )
    .await
    .map_err(|e| DomainError::unique_or(e, DomainError::AlreadyEnrolled))?;

    let progress_id = Uuid::new_v4().to_string();
    repositories::course_progress::upsert(
        &mut *tx,
        repositories::course_progress::UpsertProgress {
            id: &progress_id,
            user_id,
            course_id,
            progress: 0,
            last_viewed_section: None,
            updated_at: now,
        },
    )
    .await?;

    tx.commit().await?;

    metrics::counter!("enrollments_total").increment(1);
    tracing::info!(user_id, course_id, action = "enroll", "User enrolled");
    Ok(enrollment)
}

pub(crate) async fn update_progress(
    pool: &PgPool,
    update: ProgressUpdate<'_>,
) -> Result<i32, DomainError> {
    let progress = compute_progress(update.completed, update.total)?;
    let mut tx = pool.begin().await?;

    if repositories::enrollments::find(&mut *tx, update.user_id, update.course_id).await?.is_none()
    {
        return Err(DomainError::NotFound("Enrollment"));
    }

    if let Some(section_id) = update.last_viewed_section {
        if repositories::sections::find_in_course(&mut *tx, update.course_id, section_id)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound("Section"));
        }
    }

    let progress_id = Uuid::new_v4().to_string();
    repositories::course_progress::upsert(
        &mut *tx,
        repositories::course_progress::UpsertProgress {
            id: &progress_id,
            user_id: update.user_id,
            course_id: update.course_id,
            progress,
            last_viewed_section: update.last_viewed_section,
            updated_at: primitive_now_utc(),
        },
    )
    .await?;
    repositories::enrollments::set_progress(&mut *tx, update.user_id, update.course_id, progress)
        .await?;

    tx.commit().await?;

    metrics::counter!("progress_updates_total").increment(1);
    tracing::debug!(
        user_id = update.user_id,
        course_id = update.course_id,
        progress,
        action = "update_progress",
        "Progress stored"
    );
    Ok(progress)
}

pub(crate) async fn get_progress(
    pool: &PgPool,
    user_id: &str,
    course_id: &str,
) -> Result<ProgressSnapshot, DomainError> {
    let sections = repositories::sections::list_for_course(pool, course_id).await?;
    let stored = repositories::course_progress::find(pool, user_id, course_id).await?;

    let (progress, last_viewed) = match stored {
        Some(row) => (row.progress, row.last_viewed_section),
        None => (0, None),
    };

    Ok(ProgressSnapshot {
        progress,
        last_viewed_section: resolve_current_section(last_viewed, &sections).map(|s| s.id),
    })
}
