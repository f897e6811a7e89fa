use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;

use crate::api::errors::ApiError;
use crate::api::session_cookie;
use crate::core::state::AppState;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::services::errors::DomainError;

/// Authenticated caller resolved from the session cookie.
pub(crate) struct CurrentUser(pub(crate) User);

/// Authenticated caller with the teacher role.
pub(crate) struct CurrentTeacher(pub(crate) User);

/// Like `CurrentUser`, but anonymous requests are let through as `None`.
pub(crate) struct MaybeUser(pub(crate) Option<User>);

async fn resolve_user(parts: &Parts, state: &AppState) -> Result<Option<User>, ApiError> {
    let Some(token) =
        session_cookie::read_token(&parts.headers, &state.settings().session().cookie_name)
    else {
        return Ok(None);
    };

    let session = state.sessions().load(&token).await.map_err(DomainError::from)?;
    let Some(session) = session else {
        return Ok(None);
    };

    let user = repositories::users::find_by_id(state.db(), &session.user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?;
    if user.is_none() {
        tracing::warn!(user_id = %session.user_id, "Session points at a missing user");
    }
    Ok(user)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        match resolve_user(parts, &app_state).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(DomainError::Session.into()),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentTeacher {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.role == UserRole::Teacher {
            Ok(CurrentTeacher(user))
        } else {
            Err(ApiError::Forbidden("Teacher access required".to_string()))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve_user(parts, state).await?))
    }
}
