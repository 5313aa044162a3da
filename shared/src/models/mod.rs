//! Data models
//!
//! Typed entities for the gate server. The record store itself is
//! schema-less, so every document is decoded into one of these structs at
//! the repository boundary; deserialization failing on a missing required
//! field is the guard against half-written records.

pub mod access_log;
pub mod alert;
pub mod dashboard;
pub mod member;
pub mod membership;
pub mod pairing;
pub mod payment_log;
pub mod plan;
pub mod product;

// Re-exports
pub use access_log::*;
pub use alert::*;
pub use dashboard::*;
pub use member::*;
pub use membership::*;
pub use pairing::*;
pub use payment_log::*;
pub use plan::*;
pub use product::*;
