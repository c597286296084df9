use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::{ensure_object, Direction, Document, DocumentStore, FilterOp, Query, StoreError};

/// PostgreSQL-backed document store. Every collection lives in the single
/// `documents` table (see `db::ensure_schema`), keyed by `(collection, id)`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// LIMIT as Postgres takes it. Saturates instead of wrapping negative.
fn limit_bind(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Builds the SELECT for a query. Field names and values are always bound,
/// never interpolated.
fn build_select(collection: &str, query: &Query) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT id, data FROM documents WHERE collection = ");
    qb.push_bind(collection.to_string());

    for filter in &query.filters {
        match filter.op {
            FilterOp::Eq => {
                qb.push(" AND data -> ");
                qb.push_bind(filter.field.clone());
                qb.push("::text = ");
                qb.push_bind(Json(filter.value.clone()));
                qb.push("::jsonb");
            }
            FilterOp::Ne => {
                qb.push(" AND data -> ");
                qb.push_bind(filter.field.clone());
                qb.push("::text IS NOT NULL AND data -> ");
                qb.push_bind(filter.field.clone());
                qb.push("::text <> ");
                qb.push_bind(Json(filter.value.clone()));
                qb.push("::jsonb");
            }
        }
    }

    if let Some(order) = &query.order_by {
        qb.push(" AND data -> ");
        qb.push_bind(order.field.clone());
        qb.push("::text IS NOT NULL ORDER BY data -> ");
        qb.push_bind(order.field.clone());
        qb.push(match order.direction {
            Direction::Ascending => "::text ASC",
            Direction::Descending => "::text DESC",
        });
    } else {
        qb.push(" ORDER BY id");
    }

    if let Some(limit) = query.limit {
        qb.push(" LIMIT ");
        qb.push_bind(limit_bind(limit));
    }

    qb
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<(Json<Value>,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(Json(data),)| Document {
            id: id.to_string(),
            data,
        }))
    }

    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        ensure_object(&data)?;
        let id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(data))
            .execute(&self.pool)
            .await?;

        debug!("Inserted {collection}/{id}");
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        ensure_object(&data)?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = now()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        debug!("Upserted {collection}/{id}");
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let mut qb = build_select(collection, query);
        let rows: Vec<(String, Json<Value>)> =
            qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(data))| Document { id, data })
            .collect())
    }
}
