//! Shared utility functions

pub mod user_agent;
pub mod validation;
