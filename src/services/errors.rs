use thiserror::Error;

use crate::core::security::SecurityError;
use crate::core::session::SessionError;
use crate::db;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    WeakCredential(String),
    #[error("Email is already registered")]
    DuplicateEmail,
    #[error("You are already enrolled in this course")]
    AlreadyEnrolled,
    #[error("You have already rated this course")]
    AlreadyRated,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid password")]
    InvalidCredential,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("Authentication required")]
    Session,
    #[error("session store failed: {0}")]
    SessionStore(#[from] SessionError),
    #[error("database operation failed: {0}")]
    Persistence(#[from] sqlx::Error),
    #[error(transparent)]
    Security(#[from] SecurityError),
}

impl DomainError {
    /// Maps a unique-constraint violation to `duplicate`, anything else to `Persistence`.
    pub(crate) fn unique_or(err: sqlx::Error, duplicate: DomainError) -> Self {
        if db::is_unique_violation(&err) {
            duplicate
        } else {
            DomainError::Persistence(err)
        }
    }
}
