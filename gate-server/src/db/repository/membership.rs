//! Membership Repository

use std::sync::Arc;

use serde_json::json;

use super::{RepoResult, decode, encode};
use crate::db::collections::MEMBERSHIPS;
use crate::db::store::{Filter, RecordStore};
use shared::models::{Membership, MembershipCreate};

#[derive(Clone)]
pub struct MembershipRepository {
    store: Arc<dyn RecordStore>,
}

impl MembershipRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All memberships recorded as active for a member.
    ///
    /// Expected cardinality is zero or one; callers run the result through
    /// `Membership::pick_current` and surface duplicates as an integrity
    /// warning.
    pub async fn find_active(&self, member_id: &str) -> RepoResult<Vec<Membership>> {
        let records = self
            .store
            .query(
                MEMBERSHIPS,
                &[
                    Filter::Eq("member_id", json!(member_id)),
                    Filter::Eq("status", json!("active")),
                ],
                None,
                None,
                None,
            )
            .await?;
        records.into_iter().map(decode).collect()
    }

    /// Insert a fresh membership (first purchase or post-expiry renewal).
    pub async fn create(&self, data: &MembershipCreate) -> RepoResult<String> {
        let id = self.store.add(MEMBERSHIPS, encode(data)?).await?;
        Ok(id)
    }

    /// Renew in place: the active record keeps its id, all fields are
    /// rewritten. Updating rather than inserting is what preserves the
    /// at-most-one-active invariant.
    pub async fn renew(&self, id: &str, data: &MembershipCreate) -> RepoResult<()> {
        self.store.set(MEMBERSHIPS, id, encode(data)?, true).await?;
        Ok(())
    }
}
