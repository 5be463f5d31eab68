use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;
use crate::app::dto;
use crate::context::CurrentUser;

/// `POST /api/users`
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(errors::rejection_to_error)?;
    services.register_user(body.into()).await?;

    Ok((StatusCode::CREATED, [(header::LOCATION, "/")]))
}

/// `GET /api/users`: the authenticated user's own profile.
pub async fn current_user(Extension(current): Extension<CurrentUser>) -> impl IntoResponse {
    Json(serde_json::json!({
        "authenticatedUser": dto::user_to_json(current.profile()),
    }))
}
