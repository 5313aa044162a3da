//! Alert Repository

use std::sync::Arc;

use serde_json::json;

use super::{RepoResult, decode, encode};
use crate::db::collections::ALERTS;
use crate::db::store::{Filter, Order, RecordStore};
use shared::models::Alert;

#[derive(Clone)]
pub struct AlertRepository {
    store: Arc<dyn RecordStore>,
}

impl AlertRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn append(&self, alert: &Alert) -> RepoResult<String> {
        let id = self.store.add(ALERTS, encode(alert)?).await?;
        Ok(id)
    }

    pub async fn recent(&self, limit: usize, skip: usize) -> RepoResult<Vec<Alert>> {
        let records = self
            .store
            .query(
                ALERTS,
                &[],
                Some(Order::Desc("timestamp")),
                Some(limit),
                Some(skip),
            )
            .await?;
        records.into_iter().map(decode).collect()
    }

    pub async fn for_name(&self, name: &str) -> RepoResult<Vec<Alert>> {
        let records = self
            .store
            .query(
                ALERTS,
                &[Filter::Eq("name", json!(name))],
                Some(Order::Desc("timestamp")),
                None,
                None,
            )
            .await?;
        records.into_iter().map(decode).collect()
    }
}
