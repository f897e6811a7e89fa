pub(crate) mod categories;
pub(crate) mod course_progress;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod health;
pub(crate) mod ratings;
pub(crate) mod requirements;
pub(crate) mod sections;
pub(crate) mod sessions;
pub(crate) mod user_links;
pub(crate) mod users;
