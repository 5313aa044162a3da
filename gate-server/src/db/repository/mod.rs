//! Repository Module
//!
//! Typed access to the record store, one repository per entity. Documents
//! are decoded into `shared::models` structs at this boundary; a document
//! missing a required field surfaces as [`RepoError::Corrupt`] instead of
//! flowing through as an untyped blob.

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
pub use access_log::AccessLogRepository;
pub use alert::AlertRepository;
pub use dashboard::DashboardRepository;
pub use member::MemberRepository;
pub use membership::MembershipRepository;
pub use pairing::PairingRepository;
pub use payment_log::PaymentLogRepository;
pub use plan::PlanRepository;
pub use product::ProductRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::db::store::{Record, StoreError};
use crate::utils::AppError;

/// Repository error types
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Corrupt(msg) => AppError::Database(format!("corrupt record: {msg}")),
            RepoError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

/// Decode a stored record into a typed entity.
///
/// The document id is injected as the `id` field before deserialization,
/// so entity structs carry their id without the store persisting it twice.
pub(crate) fn decode<T: DeserializeOwned>(record: Record) -> RepoResult<T> {
    let Record { id, mut fields } = record;
    if let Value::Object(map) = &mut fields {
        map.insert("id".to_string(), Value::String(id.clone()));
    }
    serde_json::from_value(fields).map_err(|e| RepoError::Corrupt(format!("{id}: {e}")))
}

/// Serialize an entity into storable fields, stripping any `id`.
pub(crate) fn encode<T: Serialize>(entity: &T) -> RepoResult<Value> {
    let mut value = serde_json::to_value(entity).map_err(|e| RepoError::Corrupt(e.to_string()))?;
    if let Value::Object(map) = &mut value {
        map.remove("id");
    }
    Ok(value)
}
