//! Database access: connection pooling and MySQL entity stores

pub mod connection;
pub mod mysql;

pub use connection::DatabasePool;
pub use mysql::{MySqlSessionStore, MySqlUserStore};
