use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::collections::HashMap;

use crate::api::errors::ApiError;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::repositories;
use crate::repositories::courses::CourseFilter;
use crate::schemas::course::CourseListItem;
use crate::schemas::HealthResponse;
use crate::services::catalog;

const HOME_COURSE_COUNT: i64 = 3;

#[derive(Debug, Serialize)]
pub(crate) struct HomeResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) courses: Vec<CourseListItem>,
}

/// Landing page data: service info plus the newest courses.
pub(crate) async fn root(State(state): State<AppState>) -> Result<Json<HomeResponse>, ApiError> {
    let filter = CourseFilter { limit: Some(HOME_COURSE_COUNT), ..CourseFilter::default() };
    let courses = catalog::list_courses(state.db(), &filter).await?;

    let api = state.settings().api();
    Ok(Json(HomeResponse {
        message: api.project_name.clone(),
        version: api.version.clone(),
        courses: courses.into_iter().map(|row| CourseListItem::from_row(row, None)).collect(),
    }))
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut status = "healthy".to_string();
    let mut components = HashMap::new();

    match state.redis().health().await {
        crate::core::redis::RedisHealth::Healthy => {
            components.insert("redis".to_string(), "healthy".to_string());
        }
        crate::core::redis::RedisHealth::Disconnected => {
            components.insert("redis".to_string(), "disconnected".to_string());
        }
        crate::core::redis::RedisHealth::Unhealthy(error) => {
            components.insert("redis".to_string(), format!("unhealthy: {error}"));
            status = "degraded".to_string();
        }
    }

    match repositories::health::ping(state.db()).await {
        Ok(()) => {
            components.insert("database".to_string(), "healthy".to_string());
        }
        Err(err) => {
            components.insert("database".to_string(), format!("unhealthy: {err}"));
            status = "unhealthy".to_string();
        }
    }

    Json(HealthResponse { service: "ecampus-api".to_string(), status, components })
}

pub(crate) async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    if !state.settings().telemetry().prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match metrics::render() {
        Some(body) => ([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
