//! In-process memory backend (同进程存储)
//!
//! DashMap of collections, each a BTreeMap keyed by document id. Mutations
//! go through the collection's shard entry, which is what makes a single
//! `set`/`update` atomic with respect to concurrent calls. 用于测试和
//! 默认单机部署。

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::{
    Filter, Order, Record, RecordStore, StoreError, StoreResult, compare_values, merge_values,
    set_value_at_path, value_at_path,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Record>> {
        Ok(self.collections.get(collection).and_then(|docs| {
            docs.get(id).map(|fields| Record {
                id: id.to_string(),
                fields: fields.clone(),
            })
        }))
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<Order>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> StoreResult<Vec<Record>> {
        let mut matches: Vec<Record> = match self.collections.get(collection) {
            Some(docs) => docs
                .iter()
                .filter(|(_, fields)| filters.iter().all(|f| f.matches(fields)))
                .map(|(id, fields)| Record {
                    id: id.clone(),
                    fields: fields.clone(),
                })
                .collect(),
            None => Vec::new(),
        };

        if let Some(order) = order {
            let (path, descending) = match order {
                Order::Asc(p) => (p, false),
                Order::Desc(p) => (p, true),
            };
            matches.sort_by(|a, b| {
                // Documents without the sort field go last
                let ord = match (
                    value_at_path(&a.fields, path),
                    value_at_path(&b.fields, path),
                ) {
                    (Some(x), Some(y)) => {
                        compare_values(x, y).unwrap_or(std::cmp::Ordering::Equal)
                    }
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                };
                if descending { ord.reverse() } else { ord }
            });
        }

        let skipped = matches.into_iter().skip(offset.unwrap_or(0));
        Ok(match limit {
            Some(n) => skipped.take(n).collect(),
            None => skipped.collect(),
        })
    }

    async fn add(&self, collection: &str, fields: Value) -> StoreResult<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Value, merge: bool) -> StoreResult<()> {
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        if merge {
            if let Some(existing) = docs.get_mut(id) {
                merge_values(existing, fields);
                return Ok(());
            }
        }
        docs.insert(id.to_string(), fields);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: &[(String, Value)],
    ) -> StoreResult<()> {
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        let doc = docs.get_mut(id).ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;
        for (path, value) in patch {
            set_value_at_path(doc, path, value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn add_and_get() {
        let store = MemoryStore::new();
        let id = store.add("logs", json!({"n": 1})).await.unwrap();
        let record = store.get("logs", &id).await.unwrap().unwrap();
        assert_eq!(record.fields, json!({"n": 1}));
        assert!(store.get("logs", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_merge_preserves_siblings() {
        let store = MemoryStore::new();
        store
            .set("dashboard", "main", json!({"stats": {"a": 1}, "keep": true}), false)
            .await
            .unwrap();
        store
            .set("dashboard", "main", json!({"stats": {"b": 2}}), true)
            .await
            .unwrap();
        let doc = store.get("dashboard", "main").await.unwrap().unwrap();
        assert_eq!(doc.fields, json!({"stats": {"a": 1, "b": 2}, "keep": true}));
    }

    #[tokio::test]
    async fn update_dotted_path() {
        let store = MemoryStore::new();
        store
            .set("dashboard", "main", json!({"sessions": {"s1": {"exit": null}}}), false)
            .await
            .unwrap();
        store
            .update(
                "dashboard",
                "main",
                &[("sessions.s1.exit".to_string(), json!(99))],
            )
            .await
            .unwrap();
        let doc = store.get("dashboard", "main").await.unwrap().unwrap();
        assert_eq!(doc.fields, json!({"sessions": {"s1": {"exit": 99}}}));
    }

    #[tokio::test]
    async fn update_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store
            .update("dashboard", "absent", &[("x".to_string(), json!(1))])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn query_filters_order_and_pages() {
        let store = MemoryStore::new();
        for (token, ts) in [("aaa111", 10), ("aaa111", 30), ("bbb222", 20), ("aaa111", 5)] {
            store
                .add("logs", json!({"token": token, "timestamp": ts}))
                .await
                .unwrap();
        }

        let rows = store
            .query(
                "logs",
                &[Filter::Eq("token", json!("aaa111")), Filter::Ge("timestamp", json!(10))],
                Some(Order::Desc("timestamp")),
                None,
                None,
            )
            .await
            .unwrap();
        let stamps: Vec<i64> = rows
            .iter()
            .map(|r| r.fields["timestamp"].as_i64().unwrap())
            .collect();
        assert_eq!(stamps, vec![30, 10]);

        let paged = store
            .query("logs", &[], Some(Order::Asc("timestamp")), Some(2), Some(1))
            .await
            .unwrap();
        let stamps: Vec<i64> = paged
            .iter()
            .map(|r| r.fields["timestamp"].as_i64().unwrap())
            .collect();
        assert_eq!(stamps, vec![10, 20]);
    }
}
