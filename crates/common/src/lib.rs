//! Common types and wire contract shared across `encrypted-secret` crates.

pub mod arn;
pub mod payload;

pub use arn::Arn;
pub use payload::InvocationPayload;
