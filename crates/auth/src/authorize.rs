use thiserror::Error;

use coursehub_core::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: user {actor} does not own this resource (owner {owner})")]
    NotOwner { owner: UserId, actor: UserId },
}

/// Ownership check: only the owning user may mutate a resource.
///
/// - No IO
/// - No panics
/// - Pure equality on user ids
pub fn ensure_owner(owner: UserId, actor: UserId) -> Result<(), AuthzError> {
    if owner == actor {
        Ok(())
    } else {
        Err(AuthzError::NotOwner { owner, actor })
    }
}
