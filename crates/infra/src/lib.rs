//! Infrastructure layer: persistence adapters for the catalog.

pub mod db;
pub mod store;

pub use store::{
    CourseRepository, InMemoryCatalogStore, PostgresCatalogStore, StoreError, USERS_EMAIL_UNIQUE,
    UserRepository,
};
