use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::course::CourseResponse;
use crate::schemas::learning::{
    CoursePlayerResponse, EnrollResponse, PlayerCourse, PlayerSection, RateCourseRequest,
    RatingResponse, UpdateProgressRequest, UpdateProgressResponse,
};
use crate::services::enrollment::{self, ProgressUpdate};
use crate::services::errors::DomainError;
use crate::services::ratings::{self, NewRating};
use crate::services::video_embed;


pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/course_player/:course_id", get(course_player))
        .route("/course/:course_id/enroll", post(enroll))
        .route("/course/:course_id/update-progress", post(update_progress))
        .route("/rate_course", post(rate_course))
}

async fn enroll(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<EnrollResponse>), ApiError> {
    enrollment::enroll(state.db(), &user.id, &course_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollResponse {
            success: true,
            message: "Enrollment successful".to_string(),
            redirect_url: enrollment::player_url(&course_id),
        }),
    ))
}

async fn update_progress(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProgressRequest>,
) -> Result<Json<UpdateProgressResponse>, ApiError> {
    let progress = enrollment::update_progress(
        state.db(),
        ProgressUpdate {
            user_id: &user.id,
            course_id: &course_id,
            last_viewed_section: payload.last_viewed_section,
            completed: payload.completed_sections,
            total: payload.total_sections,
        },
    )
    .await?;

    Ok(Json(UpdateProgressResponse { success: true, progress }))
}

async fn course_player(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CoursePlayerResponse>, ApiError> {
    Ok(Json(build_player(&state, &user.id, &course_id).await?))
}

async fn rate_course(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<RateCourseRequest>,
) -> Result<Json<CoursePlayerResponse>, ApiError> {
    if payload.user_id.as_deref().is_some_and(|claimed| claimed != user.id) {
        tracing::warn!(user_id = %user.id, course_id = %payload.course_id, "Rating on behalf of another user refused");
        return Err(ApiError::Forbidden("Cannot rate on behalf of another user".to_string()));
    }

    ratings::add_rating(
        state.db(),
        NewRating {
            user_id: &user.id,
            course_id: &payload.course_id,
            rating: payload.rating,
            comment: payload.comment.as_deref(),
        },
    )
    .await?;

    Ok(Json(build_player(&state, &user.id, &payload.course_id).await?))
}

async fn build_player(
    state: &AppState,
    user_id: &str,
    course_id: &str,
) -> Result<CoursePlayerResponse, DomainError> {
    let course = repositories::courses::find_by_id(state.db(), course_id)
        .await?
        .ok_or(DomainError::NotFound("Course"))?;
    let category = repositories::categories::find_for_course(state.db(), course_id).await?;
    let enrolled = repositories::enrollments::find(state.db(), user_id, course_id).await?;

    let sections: Vec<PlayerSection> = repositories::sections::list_for_course(state.db(), course_id)
        .await?
        .into_iter()
        .map(|section| PlayerSection {
            video_url: video_embed::to_embed_url(&section.video_url).unwrap_or_default(),
            id: section.id,
            position: section.position,
            title: section.title,
        })
        .collect();

    let snapshot = enrollment::get_progress(state.db(), user_id, course_id).await?;
    let current_section_video_url = snapshot
        .last_viewed_section
        .and_then(|id| sections.iter().find(|section| section.id == id))
        .map(|section| section.video_url.clone());

    let rating_rows = repositories::ratings::list_for_course(state.db(), course_id)
        .await?
        .into_iter()
        .map(RatingResponse::from_row)
        .collect();
    let aggregate = ratings::get_aggregate(state.db(), course_id).await?;
    let has_rated = ratings::has_rated(state.db(), user_id, course_id).await?;

    Ok(CoursePlayerResponse {
        course: PlayerCourse {
            course: CourseResponse::from_db(course),
            category: category.map(|category| category.name),
            progress: enrolled.as_ref().map(|row| row.progress),
            enrollment_status: enrolled.map(|row| row.status),
        },
        sections,
        current_section: snapshot.last_viewed_section,
        current_section_video_url,
        ratings: rating_rows,
        average_rating: format!("{:.1}", aggregate.average),
        total_ratings: aggregate.count,
        user_id: user_id.to_string(),
        has_rated,
        current_progress: snapshot.progress,
    })
}
