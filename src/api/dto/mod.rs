//! Request and response bodies.
//!
//! Requests are validated by [`ValidatedJson`](crate::api::extractors::ValidatedJson)
//! before they are turned into domain input; responses are built from
//! domain entities and never expose password hashes.

mod access;
mod people;

pub use access::{
    NamedRef, PermissionRequest, PermissionResponse, ProfilePermissionRequest,
    ProfilePermissionResponse, ProfileRequest, ProfileResponse, RoleRequest, RoleResponse,
    UserProfileRequest, UserProfileResponse, UserRequest, UserResponse,
};
pub use people::{
    CustomerRequest, CustomerResponse, EmployeeRequest, EmployeeResponse, EmployeeUpdateRequest,
    PersonRequest, PersonResponse,
};

use serde::Deserialize;
use utoipa::IntoParams;

/// Query string accepted by every list endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListParams {
    /// Include soft-deleted records
    #[serde(default)]
    pub include_deleted: bool,
}
