use async_trait::async_trait;
use thiserror::Error;

use coursehub_catalog::{Course, CourseWithOwner, User};
use coursehub_core::CourseId;

/// Name of the unique constraint on `users.email_address`.
///
/// Both store implementations report duplicate emails under this name so the
/// API layer can translate it into a field-level validation error.
pub const USERS_EMAIL_UNIQUE: &str = "users_email_address_unique";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("referenced record does not exist: {0}")]
    MissingReference(String),

    #[error("database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn is_unique_violation_of(&self, constraint: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint: c } if c == constraint)
    }
}

/// User persistence.
///
/// Emails are stored in their normalized form; lookups expect the caller to
/// normalize too.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user. Fails with a unique violation on a duplicate email.
    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Course persistence.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist a new course. Fails with `MissingReference` if the owner does not exist.
    async fn insert(&self, course: &Course) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, StoreError>;

    async fn find_with_owner(&self, id: CourseId) -> Result<Option<CourseWithOwner>, StoreError>;

    /// All courses in creation order, each joined with its owner.
    async fn list_with_owners(&self) -> Result<Vec<CourseWithOwner>, StoreError>;

    /// Overwrite the editable fields of an existing course.
    ///
    /// Returns `false` if the course no longer exists. Never changes the owner.
    async fn update(&self, course: &Course) -> Result<bool, StoreError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, id: CourseId) -> Result<bool, StoreError>;
}
