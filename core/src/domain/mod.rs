//! Domain layer: entities and value objects

pub mod entities;

pub use entities::session::{SessionStatus, SignInSession};
pub use entities::token::{Claims, TokenKind};
pub use entities::user::{SignInDisabledReason, User, LOCK_REASON_TOO_MANY_FAILURES};
