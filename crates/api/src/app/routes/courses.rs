use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};

use coursehub_core::CourseId;

use crate::app::dto;
use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;
use crate::context::CurrentUser;

fn parse_course_id(raw: &str) -> Result<CourseId, ApiError> {
    Ok(raw.parse::<CourseId>()?)
}

pub async fn list_courses(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<impl IntoResponse, ApiError> {
    let courses = services.list_courses().await?;
    let courses: Vec<_> = courses.iter().map(dto::course_to_json).collect();

    Ok(Json(serde_json::json!({ "courses": courses })))
}

pub async fn get_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_course_id(&id)?;
    let course = services.get_course(id).await?;

    Ok(Json(serde_json::json!({ "course": dto::course_to_json(&course) })))
}

pub async fn create_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    body: Result<Json<dto::CourseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(errors::rejection_to_error)?;
    let id = services.create_course(&current, body.into()).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/courses/{id}"))],
    ))
}

/// Checked in order: the course exists, the caller owns it, the body is valid.
pub async fn update_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    body: Result<Json<dto::CourseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_course_id(&id)?;
    let course = services.course_for_change(&current, id).await?;

    let Json(body) = body.map_err(errors::rejection_to_error)?;
    services.replace_course(course, body.into()).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_course_id(&id)?;
    services.delete_course(&current, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
