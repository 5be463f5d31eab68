use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use coursehub_auth::{AuthzError, PasswordError};
use coursehub_catalog::messages;
use coursehub_core::{DomainError, ValidationErrors};
use coursehub_infra::{StoreError, USERS_EMAIL_UNIQUE};

pub const BASIC_CHALLENGE: &str = r#"Basic realm="coursehub", charset="UTF-8""#;

/// Every failure a handler can produce.
///
/// Only `Validation` carries details back to the client; everything else is
/// rendered with a fixed, opaque message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("authentication required")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationErrors> for ApiError {
    fn from(value: ValidationErrors) -> Self {
        ApiError::Validation(value)
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(errs) => ApiError::Validation(errs),
            // An id that cannot be parsed names a resource that cannot exist.
            DomainError::InvalidId(_) | DomainError::NotFound => ApiError::NotFound,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        if value.is_unique_violation_of(USERS_EMAIL_UNIQUE) {
            return ApiError::Validation(ValidationErrors::single(
                messages::EMAIL_ADDRESS,
                messages::EMAIL_TAKEN,
            ));
        }
        ApiError::Internal(anyhow::Error::new(value))
    }
}

impl From<AuthzError> for ApiError {
    fn from(_: AuthzError) -> Self {
        ApiError::Forbidden
    }
}

impl From<PasswordError> for ApiError {
    fn from(value: PasswordError) -> Self {
        ApiError::Internal(anyhow::Error::new(value))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(value: tokio::task::JoinError) -> Self {
        ApiError::Internal(anyhow::Error::new(value).context("blocking task failed"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({
                    "error": "validation_error",
                    "message": "validation failed",
                    "errors": errors,
                })),
            )
                .into_response(),
            ApiError::Unauthorized => {
                let mut resp = json_error(StatusCode::UNAUTHORIZED, "unauthorized", "access denied");
                resp.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(BASIC_CHALLENGE),
                );
                resp
            }
            ApiError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
            ApiError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "request failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "an unexpected error occurred",
                )
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub const INVALID_BODY: &str = "Please provide a valid JSON request body";

/// A body that is not acceptable JSON becomes a single `body` validation error.
///
/// The parser's detail is logged, never returned.
pub fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    tracing::debug!(detail = %rejection.body_text(), "request body rejected");
    ApiError::Validation(ValidationErrors::single("body", INVALID_BODY))
}
