//! Plan Repository

use std::sync::Arc;

use super::{RepoResult, decode};
use crate::db::collections::PLANS;
use crate::db::store::{Order, RecordStore};
use shared::models::Plan;

#[derive(Clone)]
pub struct PlanRepository {
    store: Arc<dyn RecordStore>,
}

impl PlanRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Plan>> {
        self.store.get(PLANS, id).await?.map(decode).transpose()
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Plan>> {
        let records = self
            .store
            .query(PLANS, &[], Some(Order::Asc("name")), None, None)
            .await?;
        records.into_iter().map(decode).collect()
    }
}
