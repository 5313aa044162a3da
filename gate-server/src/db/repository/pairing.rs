//! Pairing Code Repository
//!
//! Pending link codes are keyed by the code itself. The store adapter has
//! no delete, so redeemed codes are flipped to `used` instead.

use std::sync::Arc;

use serde_json::json;

use super::{RepoResult, decode, encode};
use crate::db::collections::PENDING_LINKS;
use crate::db::store::RecordStore;
use shared::models::PairingCode;

#[derive(Clone)]
pub struct PairingRepository {
    store: Arc<dyn RecordStore>,
}

impl PairingRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn find(&self, code: &str) -> RepoResult<Option<PairingCode>> {
        self.store
            .get(PENDING_LINKS, code)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn create(&self, code: &str, pending: &PairingCode) -> RepoResult<()> {
        self.store
            .set(PENDING_LINKS, code, encode(pending)?, false)
            .await?;
        Ok(())
    }

    pub async fn mark_used(&self, code: &str) -> RepoResult<()> {
        self.store
            .update(PENDING_LINKS, code, &[("status".to_string(), json!("used"))])
            .await?;
        Ok(())
    }
}
