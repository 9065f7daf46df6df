//! Profile to permission link.

use super::lifecycle::{impl_entity, Lifecycle};
use super::permission::Permission;
use super::profile::Profile;

/// Grants `permission` to `profile`. At most one active link per pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePermission {
    lifecycle: Lifecycle,
    profile: Profile,
    permission: Permission,
}

impl_entity!(ProfilePermission, "ProfilePermission");

impl ProfilePermission {
    pub fn new(profile: Profile, permission: Permission) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            profile,
            permission,
        }
    }

    pub fn restore(lifecycle: Lifecycle, profile: Profile, permission: Permission) -> Self {
        Self {
            lifecycle,
            profile,
            permission,
        }
    }

    /// Same link pointing at a new pair.
    pub fn relink(self, profile: Profile, permission: Permission) -> Self {
        let mut lifecycle = self.lifecycle;
        lifecycle.touch();
        Self {
            lifecycle,
            profile,
            permission,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn permission(&self) -> &Permission {
        &self.permission
    }
}
