//! Record Store Adapter
//!
//! Abstraction over any keyed-document backend. The gate consumes exactly
//! five operations (get / query / add / set / update); nothing here assumes
//! ordering or transactions beyond single-document atomic update, so a
//! remote document service can stand in for [`MemoryStore`] without
//! touching the repositories.

pub mod memory;

pub use memory::MemoryStore;

use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::Value;

/// A stored document: generated or caller-chosen id plus a JSON object
#[derive(Debug, Clone)]
pub struct Record {
    pub id: String,
    pub fields: Value,
}

/// Equality / range predicate on a (possibly dotted) field path.
/// Predicates in a query are ANDed together.
#[derive(Debug, Clone)]
pub enum Filter {
    Eq(&'static str, Value),
    Ge(&'static str, Value),
    Le(&'static str, Value),
}

impl Filter {
    /// Whether `doc` satisfies this predicate.
    ///
    /// A missing field or a cross-type comparison never matches.
    pub fn matches(&self, doc: &Value) -> bool {
        let (path, expected) = match self {
            Filter::Eq(p, v) | Filter::Ge(p, v) | Filter::Le(p, v) => (p, v),
        };
        let Some(actual) = value_at_path(doc, path) else {
            return false;
        };
        let Some(ord) = compare_values(actual, expected) else {
            return false;
        };
        match self {
            Filter::Eq(..) => ord == Ordering::Equal,
            Filter::Ge(..) => ord != Ordering::Less,
            Filter::Le(..) => ord != Ordering::Greater,
        }
    }
}

/// Sort direction for query results
#[derive(Debug, Clone)]
pub enum Order {
    Asc(&'static str),
    Desc(&'static str),
}

/// Record store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed-document storage consumed by the repositories
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a single document by id.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Record>>;

    /// Filtered scan with optional ordering and pagination.
    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<Order>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> StoreResult<Vec<Record>>;

    /// Insert with a generated id (insert-only).
    async fn add(&self, collection: &str, fields: Value) -> StoreResult<String>;

    /// Upsert. With `merge` the given fields are deep-merged into the
    /// existing document, preserving siblings; without it the document is
    /// replaced.
    async fn set(&self, collection: &str, id: &str, fields: Value, merge: bool) -> StoreResult<()>;

    /// Partial update by dotted field path. Fails if the document is
    /// absent. Intermediate objects along a path are created as needed.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: &[(String, Value)],
    ) -> StoreResult<()>;
}

// ── Value helpers (shared with the memory backend) ──────────────────

/// Resolve a dotted path ("sessions.xyz.exit") inside a JSON object.
pub(crate) fn value_at_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Set `value` at a dotted path, creating intermediate objects.
pub(crate) fn set_value_at_path(doc: &mut Value, path: &str, value: Value) {
    if !doc.is_object() {
        *doc = Value::Object(serde_json::Map::new());
    }
    let Value::Object(map) = doc else { return };
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
            set_value_at_path(child, rest, value);
        }
    }
}

/// Deep-merge `src` into `dst`: objects merge recursively, everything
/// else overwrites.
pub(crate) fn merge_values(dst: &mut Value, src: Value) {
    match (dst, src) {
        (Value::Object(dst_map), Value::Object(src_map)) => {
            for (key, value) in src_map {
                match dst_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        dst_map.insert(key, value);
                    }
                }
            }
        }
        (dst_slot, src_value) => *dst_slot = src_value,
    }
}

/// Compare two JSON scalars. Numbers compare numerically, strings
/// lexically; mixed or non-scalar types are incomparable.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
        return Some(x.cmp(y));
    }
    if let (Some(x), Some(y)) = (a.as_bool(), b.as_bool()) {
        return Some(x.cmp(&y));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_lookup() {
        let doc = json!({"a": {"b": {"c": 7}}});
        assert_eq!(value_at_path(&doc, "a.b.c"), Some(&json!(7)));
        assert_eq!(value_at_path(&doc, "a.missing"), None);
    }

    #[test]
    fn path_set_creates_intermediates() {
        let mut doc = json!({});
        set_value_at_path(&mut doc, "sessions.s1.exit", json!(42));
        assert_eq!(doc, json!({"sessions": {"s1": {"exit": 42}}}));
    }

    #[test]
    fn deep_merge_preserves_siblings() {
        let mut doc = json!({"sessions": {"s1": {"entry": 1}}, "stats": {"n": 2}});
        merge_values(&mut doc, json!({"sessions": {"s2": {"entry": 3}}}));
        assert_eq!(
            doc,
            json!({
                "sessions": {"s1": {"entry": 1}, "s2": {"entry": 3}},
                "stats": {"n": 2}
            })
        );
    }

    #[test]
    fn filters_match() {
        let doc = json!({"status": "denied", "timestamp": 100});
        assert!(Filter::Eq("status", json!("denied")).matches(&doc));
        assert!(Filter::Ge("timestamp", json!(100)).matches(&doc));
        assert!(!Filter::Ge("timestamp", json!(101)).matches(&doc));
        assert!(!Filter::Eq("missing", json!("x")).matches(&doc));
        // cross-type comparison never matches
        assert!(!Filter::Eq("status", json!(5)).matches(&doc));
    }
}
