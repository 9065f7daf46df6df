//! HTTP request handlers.

pub mod auth_handler;
pub mod customer_handler;
pub mod employee_handler;
pub mod permission_handler;
pub mod person_handler;
pub mod profile_handler;
pub mod profile_permission_handler;
pub mod role_handler;
pub mod user_handler;
pub mod user_profile_handler;

pub use auth_handler::auth_routes;
pub use customer_handler::{create_customer, customer_routes};
pub use employee_handler::employee_routes;
pub use permission_handler::permission_routes;
pub use person_handler::person_routes;
pub use profile_handler::profile_routes;
pub use profile_permission_handler::profile_permission_routes;
pub use role_handler::role_routes;
pub use user_handler::user_routes;
pub use user_profile_handler::user_profile_routes;
