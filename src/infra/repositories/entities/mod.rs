//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod customer;
pub mod employee;
pub mod permission;
pub mod person;
pub mod profile;
pub mod profile_permission;
pub mod role;
pub mod user;
pub mod user_profile;
