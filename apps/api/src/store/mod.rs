//! Document Store: collection-scoped, schema-less JSON documents.
//!
//! Supports get-by-id, auto-id insert, explicit-id upsert, and simple queries
//! (equality/inequality filters on top-level fields, one sort key, flat limit).
//!
//! `AppState` holds an `Arc<dyn DocumentStore>`: `PgDocumentStore` when a
//! database is configured, `MemoryDocumentStore` otherwise and in tests.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document body must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A stored document: its identifier plus the body fields, flattened on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T = Value> {
    pub id: String,
    #[serde(flatten)]
    pub data: T,
}

impl Document {
    /// Deserializes the body into a typed record.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Document<T>, StoreError> {
        Ok(Document {
            id: self.id,
            data: serde_json::from_value(self.data)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    /// Matches documents that have the field with a different value.
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A single-collection query. Built fluently:
/// `Query::new().where_eq("userId", uid).order_by("createdAt", Direction::Descending)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op: FilterOp::Eq,
            value: value.into(),
        });
        self
    }

    pub fn where_ne(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op: FilterOp::Ne,
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// The document store trait. Implement this to swap backends without touching
/// the pipelines or handlers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Inserts under a freshly minted id and returns it.
    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    /// Writes the whole document at `id`, replacing any existing body.
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;
}

/// Serializes a record into a document body.
pub fn to_body<T: Serialize>(record: &T) -> Result<Value, StoreError> {
    let value = serde_json::to_value(record)?;
    ensure_object(&value)?;
    Ok(value)
}

pub(crate) fn ensure_object(value: &Value) -> Result<(), StoreError> {
    match value {
        Value::Object(_) => Ok(()),
        Value::Null => Err(StoreError::NotAnObject("null")),
        Value::Bool(_) => Err(StoreError::NotAnObject("boolean")),
        Value::Number(_) => Err(StoreError::NotAnObject("number")),
        Value::String(_) => Err(StoreError::NotAnObject("string")),
        Value::Array(_) => Err(StoreError::NotAnObject("array")),
    }
}

/// Orders JSON values the way the query engine does: by type first, then by
/// value within a type. Strings compare lexicographically, so ISO-8601
/// timestamps sort chronologically.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
