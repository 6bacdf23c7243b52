//! HTTP layer for the Ambry backend.
//!
//! Routes under `/authn` drive the [`AuthService`] from `ambry_core`;
//! the handlers are generic over the persistence backends so the
//! integration tests can run against in-memory stores while `main`
//! wires MySQL and Redis.
//!
//! [`AuthService`]: ambry_core::services::AuthService

pub mod app;
pub mod cookies;
pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use state::AppState;
