//! Token encoding and decoding

mod service;

pub use service::TokenCodec;
