//! Route handlers

pub mod authn;
