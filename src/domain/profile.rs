//! Profile domain entity - the authorization unit attached to a token.

use super::lifecycle::{impl_entity, Lifecycle};
use super::permission::Permission;
use super::require_text;
use super::user::User;
use crate::errors::AppResult;

/// Named bundle of permissions.
///
/// `permissions` and `users` are derived from the active
/// profile-permission and user-profile links, in link insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    lifecycle: Lifecycle,
    name: String,
    description: String,
    permissions: Vec<Permission>,
    users: Vec<User>,
}

impl_entity!(Profile, "Profile");

/// Profile fields as submitted by callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileData {
    pub name: String,
    pub description: String,
}

impl Profile {
    /// New profile with no permissions or users linked yet.
    pub fn new(data: ProfileData) -> AppResult<Self> {
        Ok(Self {
            lifecycle: Lifecycle::new(),
            name: require_text("name", &data.name)?,
            description: require_text("description", &data.description)?,
            permissions: Vec::new(),
            users: Vec::new(),
        })
    }

    pub fn restore(
        lifecycle: Lifecycle,
        name: String,
        description: String,
        permissions: Vec<Permission>,
        users: Vec<User>,
    ) -> Self {
        Self {
            lifecycle,
            name,
            description,
            permissions,
            users,
        }
    }

    /// New version with revised fields; linked collections are kept.
    pub fn revise(self, data: ProfileData) -> AppResult<Self> {
        let mut lifecycle = self.lifecycle;
        lifecycle.touch();
        Ok(Self {
            lifecycle,
            name: require_text("name", &data.name)?,
            description: require_text("description", &data.description)?,
            permissions: self.permissions,
            users: self.users,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Permission names in link order, as embedded into tokens.
    pub fn permission_names(&self) -> Vec<String> {
        self.permissions
            .iter()
            .map(|permission| permission.name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PermissionData;

    fn permission(name: &str) -> Permission {
        Permission::new(PermissionData {
            name: name.to_string(),
            description: format!("{} description", name),
        })
        .unwrap()
    }

    #[test]
    fn test_permission_names_keep_link_order() {
        let profile = Profile::restore(
            Lifecycle::new(),
            "customer".to_string(),
            "Customer with limited access.".to_string(),
            vec![permission("can_view_orders"), permission("can_create_order")],
            Vec::new(),
        );

        assert_eq!(
            profile.permission_names(),
            vec!["can_view_orders".to_string(), "can_create_order".to_string()]
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Profile::new(ProfileData {
            name: "  ".to_string(),
            description: "blank".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_revise_keeps_permissions() {
        let profile = Profile::restore(
            Lifecycle::new(),
            "employee".to_string(),
            "Employee".to_string(),
            vec![permission("can_view_users")],
            Vec::new(),
        );

        let revised = profile
            .revise(ProfileData {
                name: "staff".to_string(),
                description: "Store staff".to_string(),
            })
            .unwrap();

        assert_eq!(revised.name(), "staff");
        assert_eq!(revised.permission_names(), vec!["can_view_users".to_string()]);
    }
}
