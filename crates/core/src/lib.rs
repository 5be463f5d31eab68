//! `coursehub-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the domain error model, and the field-level
//! validation error list shared by every input type.

pub mod error;
pub mod id;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use id::{CourseId, UserId};
pub use validation::{FieldError, ValidationErrors};
