use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentTeacher, CurrentUser};
use crate::core::state::AppState;
use crate::repositories;
use crate::repositories::courses::CourseFilter;
use crate::schemas::course::{
    CategoryResponse, CourseDetailsResponse, CourseForm, CourseFormResponse, CourseListItem,
    CourseResponse, CourseSavedResponse,
};
use crate::schemas::MessageResponse;
use crate::services::catalog;


const MY_COURSES_PATH: &str = "/my_courses";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/course", get(list_courses))
        .route("/my_courses", get(my_courses))
        .route("/create_course", get(create_form).post(create_course))
        .route("/course/edit/:course_id", get(edit_form).post(update_course))
        .route("/course/delete/:course_id", post(delete_course))
        .route("/course_details/:course_id", get(course_details))
}

async fn categories(state: &AppState) -> Result<Vec<CategoryResponse>, ApiError> {
    Ok(repositories::categories::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load categories"))?
        .into_iter()
        .map(CategoryResponse::from_db)
        .collect())
}

async fn list_courses(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseListItem>>, ApiError> {
    let rows = catalog::list_courses(state.db(), &CourseFilter::default()).await?;
    Ok(Json(rows.into_iter().map(|row| CourseListItem::from_row(row, Some(&user.id))).collect()))
}

async fn my_courses(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseListItem>>, ApiError> {
    let filter = CourseFilter { creator_id: Some(user.id.clone()), ..CourseFilter::default() };
    let rows = catalog::list_courses(state.db(), &filter).await?;
    Ok(Json(rows.into_iter().map(|row| CourseListItem::from_row(row, Some(&user.id))).collect()))
}

async fn create_form(
    CurrentTeacher(_teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<CourseFormResponse>, ApiError> {
    Ok(Json(CourseFormResponse { categories: categories(&state).await?, course: None }))
}

async fn create_course(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<CourseForm>,
) -> Result<(StatusCode, Json<CourseSavedResponse>), ApiError> {
    let course = catalog::create_course(state.db(), &teacher.id, &payload.into_draft()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseSavedResponse {
            success: true,
            message: "Course created".to_string(),
            redirect: MY_COURSES_PATH.to_string(),
            course: CourseResponse::from_db(course),
        }),
    ))
}

async fn edit_form(
    Path(course_id): Path<String>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<CourseFormResponse>, ApiError> {
    catalog::find_owned_course(state.db(), &course_id, &teacher.id).await?;
    let details = catalog::get_course_details(state.db(), &course_id).await?;

    Ok(Json(CourseFormResponse {
        categories: categories(&state).await?,
        course: Some(CourseDetailsResponse::from_details(details, false)),
    }))
}

async fn update_course(
    Path(course_id): Path<String>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<CourseForm>,
) -> Result<Json<CourseSavedResponse>, ApiError> {
    let course =
        catalog::update_course(state.db(), &course_id, &teacher.id, &payload.into_draft()).await?;

    Ok(Json(CourseSavedResponse {
        success: true,
        message: "Course updated".to_string(),
        redirect: MY_COURSES_PATH.to_string(),
        course: CourseResponse::from_db(course),
    }))
}

async fn delete_course(
    Path(course_id): Path<String>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    catalog::delete_course(state.db(), &course_id, &teacher.id).await?;
    Ok(Json(MessageResponse::ok("Course deleted")))
}

async fn course_details(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CourseDetailsResponse>, ApiError> {
    let details = catalog::get_course_details(state.db(), &course_id).await?;
    let has_started = repositories::enrollments::find(state.db(), &user.id, &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?
        .is_some();

    Ok(Json(CourseDetailsResponse::from_details(details, has_started)))
}
