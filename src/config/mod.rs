//! Application configuration module
//!
//! Handles environment variables, application-wide constants and the
//! permission taxonomy.

mod constants;
pub mod permissions;
mod settings;

pub use constants::*;
pub use settings::Config;
