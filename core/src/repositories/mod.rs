//! Repository interfaces and the generic CRUD layer
//!
//! Persistence is split into two seams: [`EntityStore`] is the narrow
//! backend interface (MySQL in infrastructure, [`MemoryStore`] for
//! tests), and [`CrudRepository`] layers the shared create/get/update/
//! soft-delete semantics on top of any store.

pub mod crud;
pub mod entity;
pub mod memory;
pub mod revocation;
pub mod session;
pub mod user;

pub use crud::CrudRepository;
pub use entity::{CreateSchema, Entity, EntityStore, UpdateSchema};
pub use memory::MemoryStore;
pub use revocation::{MockRevocationCache, RevocationCache};
pub use session::{NewSession, SessionFilter};
pub use user::{NewUser, UserFilter, UserPatch};
