use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::app::services::AppServices;
use crate::middleware;

pub mod courses;
pub mod system;
pub mod users;

/// Everything under `/api`.
///
/// Reads of the catalog and user registration are public; the rest goes
/// through Basic authentication. Both halves share paths and are merged per
/// method.
pub fn router(services: Arc<AppServices>) -> Router {
    let public = Router::new()
        .route("/users", post(users::create_user))
        .route("/courses", get(courses::list_courses))
        .route("/courses/:id", get(courses::get_course));

    let protected = Router::new()
        .route("/users", get(users::current_user))
        .route("/courses", post(courses::create_course))
        .route(
            "/courses/:id",
            axum::routing::put(courses::update_course).delete(courses::delete_course),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            services,
            middleware::auth_middleware,
        ));

    public.merge(protected)
}
