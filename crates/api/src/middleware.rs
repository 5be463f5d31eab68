use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use coursehub_auth::BasicCredentials;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Resolve `Authorization: Basic` credentials to a user and attach it as
/// [`CurrentUser`]. Any failure is a 401 with an opaque body.
pub async fn auth_middleware(
    State(services): State<Arc<AppServices>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = extract_basic(req.headers())?;
    let user = services.authenticate(&credentials).await?;

    req.extensions_mut().insert(CurrentUser::new(user.profile()));

    Ok(next.run(req).await)
}

fn extract_basic(headers: &HeaderMap) -> Result<BasicCredentials, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        warn!("authentication failed: missing authorization header");
        return Err(ApiError::Unauthorized);
    };

    let value = value.to_str().map_err(|_| {
        warn!("authentication failed: authorization header is not ascii");
        ApiError::Unauthorized
    })?;

    BasicCredentials::parse(value).map_err(|e| {
        warn!(error = %e, "authentication failed: malformed credentials");
        ApiError::Unauthorized
    })
}

/// One span per request, tagged with a fresh id that is echoed back in
/// `x-request-id`.
pub async fn trace_requests(req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::now_v7();
    let span = info_span!(
        "request",
        %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let started = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
