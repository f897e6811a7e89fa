//! `Set-Cookie` construction and `Cookie` parsing for the session token.

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};

use crate::core::config::Settings;

fn attributes(settings: &Settings, max_age: u64) -> String {
    let mut attrs = format!("HttpOnly; Path=/; Max-Age={max_age}; SameSite=Lax");
    if settings.session().secure_cookie {
        attrs.push_str("; Secure");
    }
    attrs
}

pub(crate) fn issue(settings: &Settings, token: &str) -> Option<HeaderValue> {
    let session = settings.session();
    let value =
        format!("{}={token}; {}", session.cookie_name, attributes(settings, session.max_age_seconds()));
    HeaderValue::from_str(&value).ok()
}

pub(crate) fn clear(settings: &Settings) -> Option<HeaderValue> {
    let value = format!("{}=; {}", settings.session().cookie_name, attributes(settings, 0));
    HeaderValue::from_str(&value).ok()
}

/// Finds the session token among all `Cookie` headers. Empty values count as absent.
pub(crate) fn read_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
