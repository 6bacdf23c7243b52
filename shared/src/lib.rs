//! Shared utilities and common types for the Ambry server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types
//! - Structured error payload types
//! - Validation and user-agent utilities

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, DatabaseConfig, Environment, ServerConfig,
};
pub use types::response::{ErrorBody, ErrorDetail};
pub use utils::{user_agent, validation};
