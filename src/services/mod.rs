//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use the Unit of Work pattern for centralized repository
//! access; the caller decides when the unit commits.

mod auth_service;
pub mod container;
mod customer_service;
mod employee_service;
mod permission_service;
mod person_service;
mod profile_permission_service;
mod profile_service;
mod removal;
mod role_service;
pub mod token;
mod user_profile_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, ServiceContext, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, TokenResponse};
pub use customer_service::{CustomerManager, CustomerService};
pub use employee_service::{EmployeeAssignment, EmployeeManager, EmployeeService, NewEmployee};
pub use permission_service::{PermissionManager, PermissionService};
pub use person_service::{PersonManager, PersonService};
pub use profile_permission_service::{ProfilePermissionManager, ProfilePermissionService};
pub use profile_service::{ProfileManager, ProfileService};
pub use role_service::{RoleManager, RoleService};
pub use token::{PersonClaims, ProfileClaims, TokenClaims, TokenIssuer};
pub use user_profile_service::{UserProfileManager, UserProfileService};
pub use user_service::{UserManager, UserService};
