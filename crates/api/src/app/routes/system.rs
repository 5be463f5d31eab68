use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::app::errors;

pub async fn welcome() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the CourseHub REST API",
    }))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "route not found")
}
