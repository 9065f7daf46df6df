//! Repository layer - Data access abstraction
//!
//! One repository per entity, all bound to the request [`Session`]. Rows are
//! converted to domain entities through the session's identity map.
//!
//! [`Session`]: crate::infra::Session

mod base;
mod customer_repository;
mod employee_repository;
pub(crate) mod entities;
mod hydrate;
mod permission_repository;
mod person_repository;
mod profile_permission_repository;
mod profile_repository;
mod role_repository;
mod user_profile_repository;
mod user_repository;

pub use customer_repository::{CustomerRepository, CustomerStore};
pub use employee_repository::{EmployeeRepository, EmployeeStore};
pub use permission_repository::{PermissionRepository, PermissionStore};
pub use person_repository::{PersonRepository, PersonStore};
pub use profile_permission_repository::{ProfilePermissionRepository, ProfilePermissionStore};
pub use profile_repository::{ProfileRepository, ProfileStore};
pub use role_repository::{RoleRepository, RoleStore};
pub use user_profile_repository::{UserProfileRepository, UserProfileStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use customer_repository::MockCustomerRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use employee_repository::MockEmployeeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use permission_repository::MockPermissionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use person_repository::MockPersonRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_permission_repository::MockProfilePermissionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_repository::MockProfileRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_profile_repository::MockUserProfileRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
