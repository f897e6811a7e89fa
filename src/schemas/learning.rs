use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::types::EnrollmentStatus;
use crate::repositories::ratings::RatingWithAuthorRow;
use crate::schemas::course::CourseResponse;

#[derive(Debug, Serialize)]
pub(crate) struct EnrollResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
    #[serde(rename = "redirectUrl")]
    pub(crate) redirect_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateProgressRequest {
    #[serde(default, alias = "lastViewedSection")]
    pub(crate) last_viewed_section: Option<i64>,
    #[serde(alias = "completedSections")]
    pub(crate) completed_sections: i64,
    #[serde(alias = "totalSections")]
    pub(crate) total_sections: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateProgressResponse {
    pub(crate) success: bool,
    pub(crate) progress: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateCourseRequest {
    #[serde(alias = "courseId")]
    pub(crate) course_id: String,
    #[serde(default, alias = "userId")]
    pub(crate) user_id: Option<String>,
    pub(crate) rating: i32,
    #[serde(default)]
    pub(crate) comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlayerSection {
    pub(crate) id: i64,
    pub(crate) position: i32,
    pub(crate) title: String,
    /// Embeddable URL; empty when the stored link is not a YouTube video.
    pub(crate) video_url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RatingResponse {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) rating: i32,
    pub(crate) comment: Option<String>,
    pub(crate) created_at: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
}

impl RatingResponse {
    pub(crate) fn from_row(row: RatingWithAuthorRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            rating: row.rating,
            comment: row.comment,
            created_at: format_primitive(row.created_at),
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PlayerCourse {
    #[serde(flatten)]
    pub(crate) course: CourseResponse,
    pub(crate) category: Option<String>,
    pub(crate) progress: Option<i32>,
    pub(crate) enrollment_status: Option<EnrollmentStatus>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CoursePlayerResponse {
    pub(crate) course: PlayerCourse,
    pub(crate) sections: Vec<PlayerSection>,
    pub(crate) current_section: Option<i64>,
    pub(crate) current_section_video_url: Option<String>,
    pub(crate) ratings: Vec<RatingResponse>,
    /// One decimal, e.g. `"4.0"`.
    pub(crate) average_rating: String,
    pub(crate) total_ratings: i64,
    pub(crate) user_id: String,
    pub(crate) has_rated: bool,
    pub(crate) current_progress: i32,
}
