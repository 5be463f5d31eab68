//! `coursehub-auth`: authentication/authorization primitives.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how to
//! hash and verify passwords, how to decode Basic credentials, and how to decide
//! whether an actor owns a resource. Looking users up is the caller's job.

pub mod authorize;
pub mod credentials;
pub mod password;

pub use authorize::{AuthzError, ensure_owner};
pub use credentials::{BasicCredentials, CredentialsError};
pub use password::{
    HashedPassword, PasswordError, hash_password, verify_password, verify_password_or_placeholder,
};
