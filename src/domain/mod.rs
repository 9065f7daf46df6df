//! Domain layer - Core business entities and logic
//!
//! Entities share a lifecycle envelope (id, timestamps, soft delete).
//! Field changes never mutate in place: `revise`-style methods consume the
//! entity and return a new validated version with the same identity.

pub mod cpf;
pub mod customer;
pub mod employee;
pub mod lifecycle;
pub mod password;
pub mod permission;
pub mod person;
pub mod principal;
pub mod profile;
pub mod profile_permission;
pub mod role;
pub mod user;
pub mod user_profile;

pub use cpf::Cpf;
pub use customer::Customer;
pub use employee::{Employee, EmploymentDates};
pub use lifecycle::{DeletePolicy, Entity, Lifecycle};
pub use password::Password;
pub use permission::{Permission, PermissionData};
pub use person::{Person, PersonData};
pub use principal::Principal;
pub use profile::{Profile, ProfileData};
pub use profile_permission::ProfilePermission;
pub use role::{Role, RoleData};
pub use user::{User, UserData};
pub use user_profile::UserProfile;

use crate::errors::{AppError, AppResult};

/// Trimmed, non-empty text field
pub(crate) fn require_text(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::invalid_field(
            field,
            format!("{} must not be empty", field),
        ));
    }
    Ok(value.to_string())
}
