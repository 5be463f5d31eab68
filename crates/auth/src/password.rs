//! Password hashing (Argon2id, PHC string format).
//!
//! Hashes are self-describing: the PHC string carries the algorithm, version,
//! cost parameters and salt, so verification does not depend on the constants
//! below staying unchanged.

use std::sync::OnceLock;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;
use thiserror::Error;

/// Memory cost in KiB.
pub const MEMORY_COST_KIB: u32 = 19_456;
/// Number of passes.
pub const TIME_COST: u32 = 2;
/// Degree of parallelism.
pub const PARALLELISM: u32 = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// A salted password hash, ready to persist.
///
/// Only ever constructed by [`hash_password`] or when loading a stored value.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a PHC string loaded from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a plaintext password with a fresh random salt.
///
/// CPU- and memory-heavy; async callers should run this on a
/// blocking thread.
pub fn hash_password(plaintext: &str) -> Result<HashedPassword, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(HashedPassword(hash.to_string()))
}

/// Check a plaintext password against a stored hash.
///
/// Returns `Ok(false)` on mismatch; errors are reserved for hashes that cannot
/// be parsed or evaluated at all.
pub fn verify_password(plaintext: &str, hashed: &HashedPassword) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hashed.as_str())
        .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

    match hasher()?.verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            tracing::warn!(error = %e, "password verification could not complete");
            Err(PasswordError::Hash(e.to_string()))
        }
    }
}

/// Plaintext behind the placeholder hash. Never a real account's password.
const PLACEHOLDER_PASSWORD: &str = "coursehub-no-such-account";

static PLACEHOLDER_HASH: OnceLock<HashedPassword> = OnceLock::new();

/// Hash verified when no account matches, built once with the same cost
/// parameters as real hashes.
fn placeholder_hash() -> Result<&'static HashedPassword, PasswordError> {
    if let Some(hash) = PLACEHOLDER_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password(PLACEHOLDER_PASSWORD)?;
    Ok(PLACEHOLDER_HASH.get_or_init(|| hash))
}

/// Verify against `stored`, or against a placeholder hash when there is no
/// stored account.
///
/// A missing account always yields `Ok(false)`, after the same Argon2 work a
/// wrong password costs, so response time does not reveal which emails exist.
pub fn verify_password_or_placeholder(
    plaintext: &str,
    stored: Option<&HashedPassword>,
) -> Result<bool, PasswordError> {
    match stored {
        Some(hashed) => verify_password(plaintext, hashed),
        None => verify_password(plaintext, placeholder_hash()?).map(|_| false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hash_verifies_original_password_only() {
        let hashed = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hashed).unwrap());
        assert!(!verify_password("battery staple", &hashed).unwrap());
    }

    #[test]
    fn hash_is_argon2id_phc_with_fixed_cost() {
        let hashed = hash_password("secret").unwrap();
        assert!(hashed.as_str().starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_is_an_error_not_a_mismatch() {
        let err = verify_password("secret", &HashedPassword::from_phc("plaintext")).unwrap_err();
        assert!(matches!(err, PasswordError::MalformedHash(_)));
    }

    #[test]
    fn missing_account_never_verifies() {
        assert!(!verify_password_or_placeholder("secret", None).unwrap());
        assert!(!verify_password_or_placeholder(PLACEHOLDER_PASSWORD, None).unwrap());
    }

    #[test]
    fn placeholder_uses_the_real_cost_parameters() {
        let placeholder = placeholder_hash().unwrap();
        assert!(placeholder.as_str().starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
        assert!(std::ptr::eq(placeholder, placeholder_hash().unwrap()));
    }

    #[test]
    fn stored_account_is_verified_normally() {
        let hashed = hash_password("secret").unwrap();
        assert!(verify_password_or_placeholder("secret", Some(&hashed)).unwrap());
        assert!(!verify_password_or_placeholder("nope", Some(&hashed)).unwrap());
    }

    #[test]
    fn debug_output_does_not_reveal_hash() {
        let hashed = hash_password("secret").unwrap();
        assert_eq!(format!("{hashed:?}"), "HashedPassword(..)");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn stored_form_never_equals_plaintext(plaintext in "\\PC{1,40}") {
            let hashed = hash_password(&plaintext).unwrap();
            prop_assert_ne!(hashed.as_str(), plaintext.as_str());
        }
    }
}
