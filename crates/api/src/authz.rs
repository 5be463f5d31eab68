//! API-side authorization guard for course mutations.
//!
//! Enforced in the service layer before any write reaches the repository.

use coursehub_auth::{AuthzError, ensure_owner};
use coursehub_catalog::Course;

use crate::context::CurrentUser;

/// Only the course owner may update or delete it.
pub fn authorize_course_change(current: &CurrentUser, course: &Course) -> Result<(), AuthzError> {
    ensure_owner(course.owner_id, current.user_id()).inspect_err(|e| {
        tracing::warn!(course_id = %course.id, error = %e, "course change refused");
    })
}
