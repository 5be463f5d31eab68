use coursehub_catalog::UserProfile;
use coursehub_core::UserId;

/// Authenticated identity for a request, attached by the auth middleware.
///
/// Carries the public profile only; the password hash never leaves the
/// middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    profile: UserProfile,
}

impl CurrentUser {
    pub fn new(profile: UserProfile) -> Self {
        Self { profile }
    }

    pub fn user_id(&self) -> UserId {
        self.profile.id
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }
}
