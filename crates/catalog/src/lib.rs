//! Course catalog domain module.
//!
//! Users and the courses they own, plus the field-level rules their inputs must
//! satisfy. Pure domain logic: no IO, no HTTP, no storage.

pub mod course;
pub mod messages;
pub mod user;

pub use course::{Course, CourseFields, CourseInput, CourseWithOwner};
pub use user::{RegisterUser, User, UserProfile, ValidRegistration, normalize_email};

/// Trimmed copy of `value`, or `None` when absent or blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
