//! Access Log Repository
//!
//! Append-only audit trail of token presentations. The fraud monitor's
//! sliding-window count is a live query against this collection, not a
//! maintained counter.

use std::sync::Arc;

use serde_json::json;

use super::{RepoResult, decode, encode};
use crate::db::collections::ACCESS_LOGS;
use crate::db::store::{Filter, Order, RecordStore};
use shared::models::AccessLogEntry;

#[derive(Clone)]
pub struct AccessLogRepository {
    store: Arc<dyn RecordStore>,
}

impl AccessLogRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn append(&self, entry: &AccessLogEntry) -> RepoResult<String> {
        let id = self.store.add(ACCESS_LOGS, encode(entry)?).await?;
        Ok(id)
    }

    /// Newest-first page of the full log.
    pub async fn recent(&self, limit: usize, skip: usize) -> RepoResult<Vec<AccessLogEntry>> {
        let records = self
            .store
            .query(
                ACCESS_LOGS,
                &[],
                Some(Order::Desc("timestamp")),
                Some(limit),
                Some(skip),
            )
            .await?;
        records.into_iter().map(decode).collect()
    }

    /// Newest-first log entries for one member.
    pub async fn for_member(&self, member_id: &str) -> RepoResult<Vec<AccessLogEntry>> {
        let records = self
            .store
            .query(
                ACCESS_LOGS,
                &[Filter::Eq("member_id", json!(member_id))],
                Some(Order::Desc("timestamp")),
                None,
                None,
            )
            .await?;
        records.into_iter().map(decode).collect()
    }

    /// Count unknown-token denials for this exact token since
    /// `since_millis` (the fraud monitor's sliding window).
    pub async fn count_unknown_denials(
        &self,
        token: &str,
        since_millis: i64,
    ) -> RepoResult<usize> {
        let records = self
            .store
            .query(
                ACCESS_LOGS,
                &[
                    Filter::Eq("token", json!(token)),
                    Filter::Eq("status", json!("denied")),
                    Filter::Eq("reason", json!("unknown_token")),
                    Filter::Ge("timestamp", json!(since_millis)),
                ],
                None,
                None,
                None,
            )
            .await?;
        Ok(records.len())
    }
}
