//! Identity Service - people, customers, employees and the
//! profile/permission model that backs bearer tokens.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration, constants and the permission taxonomy
//! - **domain**: Entities, value objects and the shared lifecycle
//! - **services**: Use cases, login flows and token issuing
//! - **infra**: Database, repositories, unit of work and the identity provider
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (applies pending migrations first)
//! identity-service serve
//!
//! # Run migrations, seed data included
//! identity-service migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{DeletePolicy, Principal};
pub use errors::{AppError, AppResult};
pub use services::TokenIssuer;
