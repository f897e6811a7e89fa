use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::user::{
    CourseProgressResponse, DeleteLinkRequest, LinkResponse, ProfileResponse, ProfileSaveRequest,
    UserResponse,
};
use crate::schemas::MessageResponse;
use crate::services::accounts::{self, ProfileUpdate};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profile))
        .route("/save", post(save))
        .route("/delete-link", post(delete_link))
}

async fn profile(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = accounts::get_profile(state.db(), &user.id).await?;

    let courses_progress = if user.role == UserRole::Student {
        repositories::enrollments::list_for_user(state.db(), &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load course progress"))?
            .into_iter()
            .map(CourseProgressResponse::from_row)
            .collect()
    } else {
        Vec::new()
    };

    let links = repositories::user_links::list_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load profile links"))?
        .into_iter()
        .map(LinkResponse::from_db)
        .collect();

    Ok(Json(ProfileResponse { user: UserResponse::from_db(user), courses_progress, links }))
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{field} is required")))
}

async fn save(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ProfileSaveRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    match payload.action.as_str() {
        "saveProfile" => {
            accounts::update_profile(
                state.db(),
                &user.id,
                ProfileUpdate {
                    first_name: required(&payload.first_name, "firstName")?,
                    last_name: required(&payload.last_name, "lastName")?,
                    email: required(&payload.email, "email")?,
                    biography: payload.biography.as_deref(),
                },
            )
            .await?;
            Ok(Json(MessageResponse::ok("Profile saved")))
        }
        "addLink" => {
            let link_name = required(&payload.link_name, "linkName")?;
            let link_url = required(&payload.link_url, "linkUrl")?;

            let exists =
                repositories::user_links::exists(state.db(), &user.id, link_name, link_url)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to check profile links"))?;
            if exists {
                return Err(ApiError::BadRequest("This link has already been added".to_string()));
            }

            repositories::user_links::create(state.db(), &user.id, link_name, link_url)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to add profile link"))?;
            Ok(Json(MessageResponse::ok("Link added")))
        }
        "editLink" => {
            let link_id = payload
                .link_id
                .ok_or_else(|| ApiError::BadRequest("linkId is required".to_string()))?;
            let link_name = required(&payload.link_name, "linkName")?;
            let link_url = required(&payload.link_url, "linkUrl")?;

            let updated = repositories::user_links::update(
                state.db(),
                link_id,
                &user.id,
                link_name,
                link_url,
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update profile link"))?;
            if !updated {
                return Err(ApiError::NotFound("Link not found".to_string()));
            }
            Ok(Json(MessageResponse::ok("Link updated")))
        }
        _ => Err(ApiError::BadRequest("Invalid action".to_string())),
    }
}

async fn delete_link(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<DeleteLinkRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = repositories::user_links::delete(state.db(), payload.link_id, &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete profile link"))?;

    if !deleted {
        return Err(ApiError::NotFound("Link not found or not owned by you".to_string()));
    }
    Ok(Json(MessageResponse::ok("Link deleted")))
}
