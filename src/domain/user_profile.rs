//! User to profile link.

use super::lifecycle::{impl_entity, Lifecycle};
use super::profile::Profile;
use super::user::User;

/// Attaches `profile` to `user`. At most one active link per pair.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    lifecycle: Lifecycle,
    user: User,
    profile: Profile,
}

impl_entity!(UserProfile, "UserProfile");

impl UserProfile {
    pub fn new(user: User, profile: Profile) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            user,
            profile,
        }
    }

    pub fn restore(lifecycle: Lifecycle, user: User, profile: Profile) -> Self {
        Self {
            lifecycle,
            user,
            profile,
        }
    }

    /// Same link pointing at a new pair.
    pub fn relink(self, user: User, profile: Profile) -> Self {
        let mut lifecycle = self.lifecycle;
        lifecycle.touch();
        Self {
            lifecycle,
            user,
            profile,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }
}
