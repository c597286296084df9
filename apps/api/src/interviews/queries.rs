//! Read-side helpers over the `interviews` collection. Every call re-queries
//! the store; there is no caching.

use serde::Deserialize;

use crate::interviews::models::{Interview, INTERVIEWS_COLLECTION};
use crate::store::{Direction, Document, DocumentStore, Query, StoreError};

pub const DEFAULT_LATEST_LIMIT: usize = 20;

/// Listing order for a user's interviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOrder {
    #[default]
    Newest,
    Oldest,
    /// Filter only; order is whatever the store returns.
    Unordered,
}

fn decode_all(docs: Vec<Document>) -> Result<Vec<Interview>, StoreError> {
    docs.into_iter().map(|doc| doc.decode()).collect()
}

pub async fn get_interview_by_id(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Interview>, StoreError> {
    match store.get(INTERVIEWS_COLLECTION, id).await? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

/// Interviews owned by `user_id`, by `createdAt` unless `Unordered`.
pub async fn get_interviews_by_user_id(
    store: &dyn DocumentStore,
    user_id: &str,
    order: ListOrder,
) -> Result<Vec<Interview>, StoreError> {
    let query = Query::new().where_eq("userId", user_id);
    let query = match order {
        ListOrder::Newest => query.order_by("createdAt", Direction::Descending),
        ListOrder::Oldest => query.order_by("createdAt", Direction::Ascending),
        ListOrder::Unordered => query,
    };
    decode_all(store.query(INTERVIEWS_COLLECTION, &query).await?)
}

/// Most recent finalized interviews owned by anyone other than `user_id`.
pub async fn get_latest_interviews(
    store: &dyn DocumentStore,
    user_id: &str,
    limit: Option<usize>,
) -> Result<Vec<Interview>, StoreError> {
    let query = Query::new()
        .where_eq("finalized", true)
        .where_ne("userId", user_id)
        .order_by("createdAt", Direction::Descending)
        .limit(limit.unwrap_or(DEFAULT_LATEST_LIMIT));
    decode_all(store.query(INTERVIEWS_COLLECTION, &query).await?)
}
