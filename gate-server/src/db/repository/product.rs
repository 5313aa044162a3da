//! Product Repository

use std::sync::Arc;

use super::{RepoResult, decode};
use crate::db::collections::PRODUCTS;
use crate::db::store::{Order, RecordStore};
use shared::models::Product;

#[derive(Clone)]
pub struct ProductRepository {
    store: Arc<dyn RecordStore>,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        self.store.get(PRODUCTS, id).await?.map(decode).transpose()
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let records = self
            .store
            .query(PRODUCTS, &[], Some(Order::Asc("name")), None, None)
            .await?;
        records.into_iter().map(decode).collect()
    }
}
