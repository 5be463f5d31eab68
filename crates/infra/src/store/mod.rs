//! Catalog persistence: repository contracts and their implementations.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
pub use r#trait::{CourseRepository, StoreError, USERS_EMAIL_UNIQUE, UserRepository};
