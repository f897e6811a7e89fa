use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::{Category, Course, Requirement, Section};
use crate::repositories::courses::CourseListRow;
use crate::services::catalog::{CourseDetails, CourseDraft, SectionDraft};

#[derive(Debug, Deserialize)]
pub(crate) struct SectionInput {
    pub(crate) title: String,
    #[serde(alias = "videoUrl")]
    pub(crate) video_url: String,
}

/// Course form body. Sections arrive either as parallel `section_title` /
/// `video_url` arrays or as a `sections` list; both are accepted.
#[derive(Debug, Deserialize)]
pub(crate) struct CourseForm {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) language: Option<String>,
    #[serde(default, alias = "coverImage")]
    pub(crate) cover_image: Option<String>,
    #[serde(default, alias = "category_id", alias = "categoryId")]
    pub(crate) category: Option<i64>,
    #[serde(default)]
    pub(crate) requirements: Vec<String>,
    #[serde(default, alias = "sectionTitle")]
    pub(crate) section_title: Vec<String>,
    #[serde(default, alias = "videoUrl")]
    pub(crate) video_url: Vec<String>,
    #[serde(default)]
    pub(crate) sections: Vec<SectionInput>,
}

impl CourseForm {
    pub(crate) fn into_draft(self) -> CourseDraft {
        let mut sections: Vec<SectionDraft> = self
            .section_title
            .into_iter()
            .zip(self.video_url)
            .map(|(title, video_url)| SectionDraft { title, video_url })
            .collect();
        sections.extend(
            self.sections
                .into_iter()
                .map(|section| SectionDraft { title: section.title, video_url: section.video_url }),
        );

        CourseDraft {
            name: self.name,
            description: self.description,
            language: self.language,
            cover_image: self.cover_image,
            category_id: self.category,
            requirements: self.requirements,
            sections,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl CategoryResponse {
    pub(crate) fn from_db(category: Category) -> Self {
        Self { id: category.id, name: category.name }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) creator_id: String,
    pub(crate) language: Option<String>,
    pub(crate) cover_image: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            creator_id: course.creator_id,
            language: course.language,
            cover_image: course.cover_image,
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseListItem {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) creator_id: String,
    pub(crate) creator_name: String,
    pub(crate) language: Option<String>,
    pub(crate) cover_image: Option<String>,
    pub(crate) category_name: Option<String>,
    pub(crate) created_at: String,
    pub(crate) is_owner: bool,
}

impl CourseListItem {
    pub(crate) fn from_row(row: CourseListRow, viewer_id: Option<&str>) -> Self {
        let is_owner = viewer_id == Some(row.creator_id.as_str());
        Self {
            creator_name: format!("{} {}", row.creator_first_name, row.creator_last_name),
            id: row.id,
            name: row.name,
            description: row.description,
            creator_id: row.creator_id,
            language: row.language,
            cover_image: row.cover_image,
            category_name: row.category_name,
            created_at: format_primitive(row.created_at),
            is_owner,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RequirementResponse {
    pub(crate) id: i64,
    pub(crate) position: i32,
    pub(crate) text: String,
}

impl RequirementResponse {
    pub(crate) fn from_db(requirement: Requirement) -> Self {
        Self {
            id: requirement.id,
            position: requirement.position,
            text: requirement.requirement_text,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SectionResponse {
    pub(crate) id: i64,
    pub(crate) position: i32,
    pub(crate) title: String,
    pub(crate) video_url: String,
}

impl SectionResponse {
    pub(crate) fn from_db(section: Section) -> Self {
        Self {
            id: section.id,
            position: section.position,
            title: section.title,
            video_url: section.video_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseDetailsResponse {
    pub(crate) course: CourseResponse,
    pub(crate) category: Option<CategoryResponse>,
    pub(crate) requirements: Vec<RequirementResponse>,
    pub(crate) sections: Vec<SectionResponse>,
    pub(crate) has_started: bool,
}

impl CourseDetailsResponse {
    pub(crate) fn from_details(details: CourseDetails, has_started: bool) -> Self {
        Self {
            course: CourseResponse::from_db(details.course),
            category: details.category.map(CategoryResponse::from_db),
            requirements: details.requirements.into_iter().map(RequirementResponse::from_db).collect(),
            sections: details.sections.into_iter().map(SectionResponse::from_db).collect(),
            has_started,
        }
    }
}

/// Data for the create/edit form: available categories plus the current course, if editing.
#[derive(Debug, Serialize)]
pub(crate) struct CourseFormResponse {
    pub(crate) categories: Vec<CategoryResponse>,
    pub(crate) course: Option<CourseDetailsResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseSavedResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
    pub(crate) redirect: String,
    pub(crate) course: CourseResponse,
}
