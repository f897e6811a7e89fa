use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::{User, UserLink};
use crate::db::types::{EnrollmentStatus, UserRole};
use crate::repositories::enrollments::EnrolledCourseRow;

/// Public user view; the password hash never leaves the server.
#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) role: UserRole,
    pub(crate) biography: Option<String>,
    pub(crate) profile_image: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            biography: user.biography,
            profile_image: user.profile_image,
            created_at: format_primitive(user.created_at),
            updated_at: format_primitive(user.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LinkResponse {
    pub(crate) id: i64,
    pub(crate) link_name: String,
    pub(crate) link_url: String,
}

impl LinkResponse {
    pub(crate) fn from_db(link: UserLink) -> Self {
        Self { id: link.id, link_name: link.link_name, link_url: link.link_url }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseProgressResponse {
    pub(crate) course_id: String,
    pub(crate) course_name: String,
    pub(crate) progress: i32,
    pub(crate) status: EnrollmentStatus,
    pub(crate) enrolled_at: String,
}

impl CourseProgressResponse {
    pub(crate) fn from_row(row: EnrolledCourseRow) -> Self {
        Self {
            course_id: row.course_id,
            course_name: row.course_name,
            progress: row.progress,
            status: row.status,
            enrolled_at: format_primitive(row.enrolled_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileResponse {
    pub(crate) user: UserResponse,
    pub(crate) courses_progress: Vec<CourseProgressResponse>,
    pub(crate) links: Vec<LinkResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileSaveRequest {
    pub(crate) action: String,
    #[serde(default, alias = "firstName")]
    pub(crate) first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) biography: Option<String>,
    #[serde(default, alias = "linkId")]
    pub(crate) link_id: Option<i64>,
    #[serde(default, alias = "linkName")]
    pub(crate) link_name: Option<String>,
    #[serde(default, alias = "linkUrl")]
    pub(crate) link_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteLinkRequest {
    #[serde(alias = "deleteLinkId")]
    pub(crate) link_id: i64,
}
