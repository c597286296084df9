use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    compare_values, ensure_object, Direction, Document, DocumentStore, FilterOp, Query, StoreError,
};

/// In-process document store. Used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    #[cfg(test)]
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

fn matches_filters(data: &Value, query: &Query) -> bool {
    query.filters.iter().all(|filter| {
        let field = data.get(&filter.field);
        match filter.op {
            FilterOp::Eq => field == Some(&filter.value),
            FilterOp::Ne => field.is_some_and(|v| v != &filter.value),
        }
    })
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        ensure_object(&data)?;
        let id = Uuid::new_v4().to_string();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        ensure_object(&data)?;
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<Document> = docs
            .iter()
            .filter(|(_, data)| matches_filters(data, query))
            .map(|(id, data)| Document {
                id: id.clone(),
                data: data.clone(),
            })
            .collect();

        if let Some(order) = &query.order_by {
            // Documents without the sort field are excluded, as the managed store does.
            results.retain(|doc| doc.data.get(&order.field).is_some());
            results.sort_by(|a, b| {
                let ordering = compare_values(&a.data[&order.field], &b.data[&order.field]);
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            results.truncate(limit);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn seeded() -> MemoryDocumentStore {
        let store = MemoryDocumentStore::new();
        for (user, created, finalized) in [
            ("u1", "2025-01-01T00:00:00.000Z", true),
            ("u2", "2025-01-03T00:00:00.000Z", true),
            ("u3", "2025-01-02T00:00:00.000Z", false),
        ] {
            store
                .add(
                    "interviews",
                    json!({"userId": user, "createdAt": created, "finalized": finalized}),
                )
                .await
                .unwrap();
        }
        store
            .add("interviews", json!({"finalized": true}))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_add_mints_distinct_ids_for_identical_bodies() {
        let store = MemoryDocumentStore::new();
        let a = store.add("feedback", json!({"x": 1})).await.unwrap();
        let b = store.add("feedback", json!({"x": 1})).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.count("feedback").await, 2);
    }

    #[tokio::test]
    async fn test_set_replaces_whole_document() {
        let store = MemoryDocumentStore::new();
        store
            .set("users", "u1", json!({"name": "Ada", "email": "ada@example.com"}))
            .await
            .unwrap();
        store
            .set("users", "u1", json!({"name": "Ada L."}))
            .await
            .unwrap();
        let doc = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(doc.data, json!({"name": "Ada L."}));
        assert_eq!(store.count("users").await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = MemoryDocumentStore::new();
        assert!(store.get("users", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_object_body_is_rejected() {
        let store = MemoryDocumentStore::new();
        let result = store.add("users", json!("just a string")).await;
        assert!(matches!(result, Err(StoreError::NotAnObject("string"))));
        assert_eq!(store.count("users").await, 0);
    }

    #[tokio::test]
    async fn test_ne_filter_excludes_missing_field() {
        let store = seeded().await;
        let docs = store
            .query("interviews", &Query::new().where_ne("userId", "u1"))
            .await
            .unwrap();
        let users: Vec<_> = docs.iter().map(|d| d.data["userId"].clone()).collect();
        assert_eq!(users.len(), 2);
        assert!(!users.contains(&json!("u1")));
    }

    #[tokio::test]
    async fn test_filter_order_and_limit() {
        let store = seeded().await;
        let query = Query::new()
            .where_eq("finalized", true)
            .order_by("createdAt", Direction::Descending)
            .limit(5);
        let docs = store.query("interviews", &query).await.unwrap();
        let created: Vec<_> = docs
            .iter()
            .map(|d| d.data["createdAt"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            created,
            vec!["2025-01-03T00:00:00.000Z", "2025-01-01T00:00:00.000Z"]
        );

        let limited = store
            .query(
                "interviews",
                &Query::new()
                    .order_by("createdAt", Direction::Ascending)
                    .limit(1),
            )
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].data["userId"], "u1");
    }

    #[tokio::test]
    async fn test_query_unknown_collection_is_empty() {
        let store = MemoryDocumentStore::new();
        let docs = store.query("feedback", &Query::new()).await.unwrap();
        assert!(docs.is_empty());
    }
}
