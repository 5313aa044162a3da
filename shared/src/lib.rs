//! Shared types for the gate server
//!
//! Entity models and small utilities used across the workspace:
//! members, memberships, the presence dashboard, audit records.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
