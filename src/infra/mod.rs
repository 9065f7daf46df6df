//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Request sessions with their identity maps
//! - Unit of Work for transaction management
//! - The external identity-provider client

pub mod db;
pub mod identity_map;
pub mod identity_provider;
pub mod repositories;
pub mod session;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use identity_map::IdentityMap;
pub use identity_provider::{
    provider_from_config, HttpIdentityProvider, IdentityProvider, NoopIdentityProvider,
};
pub use repositories::{
    CustomerRepository, EmployeeRepository, PermissionRepository, PersonRepository,
    ProfilePermissionRepository, ProfileRepository, RoleRepository, UserProfileRepository,
    UserRepository,
};
pub use session::Session;
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use identity_provider::MockIdentityProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCustomerRepository, MockEmployeeRepository, MockPermissionRepository,
    MockPersonRepository, MockProfilePermissionRepository, MockProfileRepository,
    MockRoleRepository, MockUserProfileRepository, MockUserRepository,
};
