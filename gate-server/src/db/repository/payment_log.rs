//! Payment Log Repository

use std::sync::Arc;

use super::{RepoResult, decode, encode};
use crate::db::collections::PAYMENT_LOGS;
use crate::db::store::{Order, RecordStore};
use shared::models::PaymentLogEntry;

#[derive(Clone)]
pub struct PaymentLogRepository {
    store: Arc<dyn RecordStore>,
}

impl PaymentLogRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn append(&self, entry: &PaymentLogEntry) -> RepoResult<String> {
        let id = self.store.add(PAYMENT_LOGS, encode(entry)?).await?;
        Ok(id)
    }

    pub async fn recent(&self, limit: usize, skip: usize) -> RepoResult<Vec<PaymentLogEntry>> {
        let records = self
            .store
            .query(
                PAYMENT_LOGS,
                &[],
                Some(Order::Desc("timestamp")),
                Some(limit),
                Some(skip),
            )
            .await?;
        records.into_iter().map(decode).collect()
    }
}
