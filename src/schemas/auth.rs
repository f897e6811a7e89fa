use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SignupRequest {
    #[serde(alias = "firstName", alias = "first_name")]
    #[validate(length(min = 1, max = 100, message = "name must contain 1..100 characters"))]
    pub(crate) name: String,
    #[serde(alias = "lastName", alias = "last_name")]
    #[validate(length(min = 1, max = 100, message = "lastname must contain 1..100 characters"))]
    pub(crate) lastname: String,
    pub(crate) email: String,
    pub(crate) password: String,
    #[serde(default = "default_role")]
    pub(crate) role: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SigninRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthRedirectResponse {
    pub(crate) message: String,
    pub(crate) redirect: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckAuthResponse {
    pub(crate) authenticated: bool,
}

fn default_role() -> String {
    "student".to_string()
}
