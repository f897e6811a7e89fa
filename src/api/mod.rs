pub(crate) mod auth;
pub(crate) mod courses;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod learning;
pub(crate) mod profile;
pub(crate) mod router;
pub(crate) mod session_cookie;
