//! Password hashing and policy enforcement

mod service;

pub use service::PasswordService;
