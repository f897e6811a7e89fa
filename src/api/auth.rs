use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::MaybeUser;
use crate::api::session_cookie;
use crate::core::metrics::record_auth_attempt;
use crate::core::state::AppState;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::schemas::auth::{
    AuthRedirectResponse, CheckAuthResponse, SigninRequest, SignupRequest,
};
use crate::services::accounts::{self, NewAccount};
use crate::services::errors::DomainError;

/// Max attempts per window for signup/signin.
const AUTH_RATE_LIMIT: u64 = 10;
/// Rate limit window in seconds.
const AUTH_RATE_WINDOW_SECONDS: u64 = 60;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/logout", get(logout))
        .route("/check-auth", get(check_auth))
}

async fn enforce_rate_limit(state: &AppState, key: &str) -> Result<(), ApiError> {
    let allowed =
        match state.redis().rate_limit(key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS).await {
            Ok(allowed) => allowed,
            Err(err) => {
                tracing::warn!(error = %err, key, "Rate limit check skipped");
                true
            }
        };
    if allowed {
        Ok(())
    } else {
        Err(ApiError::TooManyRequests("Too many attempts, try again later"))
    }
}

async fn start_session(
    state: &AppState,
    user: &User,
    message: &str,
) -> Result<Response, ApiError> {
    let token = state.sessions().create(&user.id).await.map_err(DomainError::from)?;
    let cookie = session_cookie::issue(state.settings(), &token)
        .ok_or_else(|| {
            ApiError::internal("invalid header value", "Failed to build session cookie")
        })?;

    let body = AuthRedirectResponse { message: message.to_string(), redirect: "/".to_string() };
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let email = accounts::normalize_email(&payload.email);
    enforce_rate_limit(&state, &format!("rl:signup:{email}")).await?;

    let role = UserRole::parse(&payload.role)
        .ok_or_else(|| ApiError::BadRequest("Role must be student or teacher".to_string()))?;

    let result = accounts::register(
        state.db(),
        NewAccount {
            first_name: &payload.name,
            last_name: &payload.lastname,
            email: &email,
            password: &payload.password,
            role,
        },
    )
    .await;

    let user = match result {
        Ok(user) => user,
        Err(err) => {
            record_auth_attempt("signup", "rejected");
            return Err(err.into());
        }
    };

    record_auth_attempt("signup", "success");
    start_session(&state, &user, "Registration successful").await
}

async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> Result<Response, ApiError> {
    let email = accounts::normalize_email(&payload.email);
    enforce_rate_limit(&state, &format!("rl:signin:{email}")).await?;

    let user = match accounts::authenticate(state.db(), &email, &payload.password).await {
        Ok(user) => user,
        Err(DomainError::NotFound(_)) => {
            record_auth_attempt("signin", "unknown_user");
            return Err(ApiError::Unauthorized("User not found".to_string()));
        }
        Err(err @ DomainError::InvalidCredential) => {
            record_auth_attempt("signin", "invalid_password");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    record_auth_attempt("signin", "success");
    tracing::info!(user_id = %user.id, action = "signin", "Session established");
    start_session(&state, &user, "Signed in successfully").await
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let cookie_name = &state.settings().session().cookie_name;
    if let Some(token) = session_cookie::read_token(&headers, cookie_name) {
        state.sessions().destroy(&token).await.map_err(DomainError::from)?;
    }

    let cleared = session_cookie::clear(state.settings())
        .ok_or_else(|| {
            ApiError::internal("invalid header value", "Failed to build session cookie")
        })?;
    Ok(([(header::SET_COOKIE, cleared)], Redirect::to("/")).into_response())
}

async fn check_auth(MaybeUser(user): MaybeUser) -> (StatusCode, Json<CheckAuthResponse>) {
    match user {
        Some(_) => (StatusCode::OK, Json(CheckAuthResponse { authenticated: true })),
        None => (StatusCode::UNAUTHORIZED, Json(CheckAuthResponse { authenticated: false })),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header, Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::db::types::UserRole;
    use crate::test_support;

    fn cookie_pair(response: &axum::response::Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("set-cookie header")
            .to_str()
            .expect("ascii cookie");
        set_cookie.split(';').next().expect("cookie pair").to_string()
    }

    #[tokio::test]
    async fn signup_sets_session_cookie_and_authenticates() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/signup",
                None,
                Some(json!({
                    "name": "Lucia",
                    "lastname": "Garcia",
                    "email": "lucia@example.com",
                    "password": "lucia-secret",
                    "role": "teacher"
                })),
            ))
            .await
            .expect("signup response");

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = cookie_pair(&response);
        assert!(cookie.starts_with("ecampus_sid="));
        let body = test_support::read_json(response).await;
        assert_eq!(body["redirect"], "/");

        let check = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, "/check-auth", Some(&cookie), None))
            .await
            .expect("check-auth response");
        assert_eq!(check.status(), StatusCode::OK);
        assert_eq!(test_support::read_json(check).await["authenticated"], true);
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_and_weak_credentials() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_user(ctx.state.db(), "taken@example.com", UserRole::Student, "pass-word")
            .await;

        let duplicate = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/signup",
                None,
                Some(json!({
                    "name": "Other",
                    "lastname": "Person",
                    "email": "taken@example.com",
                    "password": "long-enough",
                    "role": "student"
                })),
            ))
            .await
            .expect("duplicate response");
        assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
        let body = test_support::read_json(duplicate).await;
        assert_eq!(body["error"], "Email is already registered");

        let weak = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/signup",
                None,
                Some(json!({
                    "name": "Weak",
                    "lastname": "Password",
                    "email": "weak@example.com",
                    "password": "short",
                    "role": "student"
                })),
            ))
            .await
            .expect("weak response");
        assert_eq!(weak.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signin_failures_return_401() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_user(ctx.state.db(), "known@example.com", UserRole::Student, "right-pass")
            .await;

        for (email, password) in
            [("unknown@example.com", "right-pass"), ("known@example.com", "wrong-pass")]
        {
            let response = ctx
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::POST,
                    "/signin",
                    None,
                    Some(json!({ "email": email, "password": password })),
                ))
                .await
                .expect("signin response");
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert!(test_support::read_json(response).await["error"].is_string());
        }

        let ok = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/signin",
                None,
                Some(json!({ "email": "known@example.com", "password": "right-pass" })),
            ))
            .await
            .expect("signin response");
        assert_eq!(ok.status(), StatusCode::OK);
        assert!(ok.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn logout_destroys_session_and_redirects_home() {
        let ctx = test_support::setup_test_context().await;
        let user = test_support::insert_user(
            ctx.state.db(),
            "leaving@example.com",
            UserRole::Student,
            "leaving-pass",
        )
        .await;
        let cookie = test_support::session_cookie(&ctx.state, &user).await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, "/logout", Some(&cookie), None))
            .await
            .expect("logout response");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cleared = response.headers()[header::SET_COOKIE].to_str().expect("ascii");
        assert!(cleared.contains("Max-Age=0"));

        let check = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, "/check-auth", Some(&cookie), None))
            .await
            .expect("check-auth response");
        assert_eq!(check.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(test_support::read_json(check).await["authenticated"], false);
    }
}
