//! Authorization resources: permissions, profiles, roles, users and the
//! links between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    Entity, Permission, PermissionData, Profile, ProfileData, ProfilePermission, Role, RoleData,
    User, UserData, UserProfile,
};

/// Id and name of a referenced record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

/// Create or update a permission
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PermissionRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "can_view_orders")]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Description must be between 1 and 255 characters"))]
    #[schema(example = "Allows to view orders")]
    pub description: String,
}

impl From<PermissionRequest> for PermissionData {
    fn from(request: PermissionRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PermissionResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inactivated_at: Option<DateTime<Utc>>,
}

impl From<&Permission> for PermissionResponse {
    fn from(permission: &Permission) -> Self {
        let lifecycle = permission.lifecycle();
        Self {
            id: permission.id(),
            name: permission.name().to_string(),
            description: permission.description().to_string(),
            created_at: lifecycle.created_at(),
            updated_at: lifecycle.updated_at(),
            inactivated_at: lifecycle.inactivated_at(),
        }
    }
}

/// Create or update a profile
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "customer")]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Description must be between 1 and 255 characters"))]
    #[schema(example = "Customer with limited access.")]
    pub description: String,
}

impl From<ProfileRequest> for ProfileData {
    fn from(request: ProfileRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}

/// Profile with the permissions it currently grants
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub permissions: Vec<NamedRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inactivated_at: Option<DateTime<Utc>>,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        let lifecycle = profile.lifecycle();
        Self {
            id: profile.id(),
            name: profile.name().to_string(),
            description: profile.description().to_string(),
            permissions: profile
                .permissions()
                .iter()
                .map(|permission| NamedRef {
                    id: permission.id(),
                    name: permission.name().to_string(),
                })
                .collect(),
            created_at: lifecycle.created_at(),
            updated_at: lifecycle.updated_at(),
            inactivated_at: lifecycle.inactivated_at(),
        }
    }
}

/// Create or update an employee role
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RoleRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "manager")]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Description must be between 1 and 255 characters"))]
    #[schema(example = "store manager with full access")]
    pub description: String,
}

impl From<RoleRequest> for RoleData {
    fn from(request: RoleRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inactivated_at: Option<DateTime<Utc>>,
}

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        let lifecycle = role.lifecycle();
        Self {
            id: role.id(),
            name: role.name().to_string(),
            description: role.description().to_string(),
            created_at: lifecycle.created_at(),
            updated_at: lifecycle.updated_at(),
            inactivated_at: lifecycle.inactivated_at(),
        }
    }
}

/// Create or update a login account
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserRequest {
    #[validate(length(min = 3, max = 100, message = "Name must be between 3 and 100 characters"))]
    #[schema(example = "jdoe")]
    pub name: String,
    #[validate(length(min = 8, max = 50, message = "Password must be between 8 and 50 characters"))]
    #[schema(example = "s3cret-pass", min_length = 8, max_length = 50)]
    pub password: String,
}

impl From<UserRequest> for UserData {
    fn from(request: UserRequest) -> Self {
        Self {
            name: request.name,
            password: request.password,
        }
    }
}

/// Login account (password hash omitted)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inactivated_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let lifecycle = user.lifecycle();
        Self {
            id: user.id(),
            name: user.name().to_string(),
            created_at: lifecycle.created_at(),
            updated_at: lifecycle.updated_at(),
            inactivated_at: lifecycle.inactivated_at(),
        }
    }
}

/// Grant a permission to a profile
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProfilePermissionRequest {
    pub profile_id: Uuid,
    pub permission_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfilePermissionResponse {
    pub id: Uuid,
    pub profile: NamedRef,
    pub permission: NamedRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inactivated_at: Option<DateTime<Utc>>,
}

impl From<&ProfilePermission> for ProfilePermissionResponse {
    fn from(link: &ProfilePermission) -> Self {
        let lifecycle = link.lifecycle();
        Self {
            id: link.id(),
            profile: NamedRef {
                id: link.profile().id(),
                name: link.profile().name().to_string(),
            },
            permission: NamedRef {
                id: link.permission().id(),
                name: link.permission().name().to_string(),
            },
            created_at: lifecycle.created_at(),
            updated_at: lifecycle.updated_at(),
            inactivated_at: lifecycle.inactivated_at(),
        }
    }
}

/// Assign a profile to a user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserProfileRequest {
    pub user_id: Uuid,
    pub profile_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    pub id: Uuid,
    pub user: NamedRef,
    pub profile: NamedRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inactivated_at: Option<DateTime<Utc>>,
}

impl From<&UserProfile> for UserProfileResponse {
    fn from(link: &UserProfile) -> Self {
        let lifecycle = link.lifecycle();
        Self {
            id: link.id(),
            user: NamedRef {
                id: link.user().id(),
                name: link.user().name().to_string(),
            },
            profile: NamedRef {
                id: link.profile().id(),
                name: link.profile().name().to_string(),
            },
            created_at: lifecycle.created_at(),
            updated_at: lifecycle.updated_at(),
            inactivated_at: lifecycle.inactivated_at(),
        }
    }
}
