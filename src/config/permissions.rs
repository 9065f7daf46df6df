//! Permission taxonomy.
//!
//! Every managed resource gets four permissions following the
//! `can_<verb>_<noun>` convention. Create/update/delete use the singular
//! noun, view uses the plural.

macro_rules! resource_permissions {
    ($module:ident, $singular:literal, $plural:literal) => {
        pub mod $module {
            pub const CREATE: &str = concat!("can_create_", $singular);
            pub const VIEW: &str = concat!("can_view_", $plural);
            pub const UPDATE: &str = concat!("can_update_", $singular);
            pub const DELETE: &str = concat!("can_delete_", $singular);

            pub const ALL: [&str; 4] = [CREATE, VIEW, UPDATE, DELETE];
        }
    };
}

resource_permissions!(permissions, "permission", "permissions");
resource_permissions!(profiles, "profile", "profiles");
resource_permissions!(profile_permissions, "profile_permission", "profile_permissions");
resource_permissions!(roles, "role", "roles");
resource_permissions!(users, "user", "users");
resource_permissions!(user_profiles, "user_profile", "user_profiles");
resource_permissions!(persons, "person", "persons");
resource_permissions!(customers, "customer", "customers");
resource_permissions!(employees, "employee", "employees");

/// Every permission, resource by resource.
pub fn all() -> impl Iterator<Item = &'static str> {
    [
        permissions::ALL,
        profiles::ALL,
        profile_permissions::ALL,
        roles::ALL,
        users::ALL,
        user_profiles::ALL,
        persons::ALL,
        customers::ALL,
        employees::ALL,
    ]
    .into_iter()
    .flatten()
}

/// Seeded description for a permission name.
pub fn describe(name: &str) -> String {
    let mut words = name.trim_start_matches("can_").split('_');
    let verb = words.next().unwrap_or_default();
    let noun = words.collect::<Vec<_>>().join(" ");
    format!("Allows to {} {}", verb, noun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_names_follow_convention() {
        assert_eq!(customers::CREATE, "can_create_customer");
        assert_eq!(customers::VIEW, "can_view_customers");
        assert_eq!(profile_permissions::DELETE, "can_delete_profile_permission");
    }

    #[test]
    fn test_all_covers_every_resource() {
        let names: Vec<_> = all().collect();
        assert_eq!(names.len(), 36);
        assert!(names.contains(&employees::VIEW));
        assert_eq!(names.iter().filter(|n| n.starts_with("can_view_")).count(), 9);
    }

    #[test]
    fn test_describe_permission() {
        assert_eq!(describe(users::VIEW), "Allows to view users");
        assert_eq!(
            describe(user_profiles::UPDATE),
            "Allows to update user profile"
        );
    }
}
