//! Registered users.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use coursehub_auth::HashedPassword;
use coursehub_core::{DomainError, DomainResult, UserId, ValidationErrors};

use crate::messages;
use crate::non_blank;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Canonical form used for storage and lookup (trimmed, lower-cased).
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A persisted user. The password is only ever held in hashed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public view: no password, no timestamps.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email_address: self.email_address.clone(),
        }
    }
}

/// What a client may see about a user (the authenticated identity, or a course owner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

/// Raw registration input; every field may be missing.
#[derive(Debug, Clone, Default)]
pub struct RegisterUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
}

impl RegisterUser {
    /// Run every field rule, collecting all failures.
    pub fn validate(self) -> DomainResult<ValidRegistration> {
        let mut errors = ValidationErrors::new();

        let first_name = non_blank(self.first_name);
        if first_name.is_none() {
            errors.push(messages::FIRST_NAME, messages::FIRST_NAME_REQUIRED);
        }

        let last_name = non_blank(self.last_name);
        if last_name.is_none() {
            errors.push(messages::LAST_NAME, messages::LAST_NAME_REQUIRED);
        }

        let email_address = non_blank(self.email_address).map(|e| normalize_email(&e));
        match &email_address {
            None => errors.push(messages::EMAIL_ADDRESS, messages::EMAIL_REQUIRED),
            Some(email) if !EMAIL_SHAPE.is_match(email) => {
                errors.push(messages::EMAIL_ADDRESS, messages::EMAIL_INVALID)
            }
            Some(_) => {}
        }

        let password = self.password.filter(|p| !p.is_empty());
        if password.is_none() {
            errors.push(messages::PASSWORD, messages::PASSWORD_REQUIRED);
        }

        match (first_name, last_name, email_address, password) {
            (Some(first_name), Some(last_name), Some(email_address), Some(password))
                if errors.is_empty() =>
            {
                Ok(ValidRegistration {
                    first_name,
                    last_name,
                    email_address,
                    password,
                })
            }
            _ => Err(DomainError::Validation(errors)),
        }
    }
}

/// Registration that passed validation. Still carries the plaintext password,
/// which [`ValidRegistration::into_user`] drops in exchange for its hash.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    first_name: String,
    last_name: String,
    email_address: String,
    password: String,
}

impl ValidRegistration {
    pub fn email_address(&self) -> &str {
        &self.email_address
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn into_user(self, password_hash: HashedPassword, now: DateTime<Utc>) -> User {
        User {
            id: UserId::new(),
            first_name: self.first_name,
            last_name: self.last_name,
            email_address: self.email_address,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

impl core::fmt::Debug for ValidRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ValidRegistration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_address", &self.email_address)
            .finish_non_exhaustive()
    }
}
