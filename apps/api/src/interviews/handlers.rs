//! Axum route handlers for interview generation and listing.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::identity::SessionUser;
use crate::interviews::generator::generate_interview;
use crate::interviews::models::{missing_fields, GenerateRequest, Interview};
use crate::interviews::queries::{
    get_interview_by_id, get_interviews_by_user_id, get_latest_interviews, ListOrder,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub order: ListOrder,
}

#[derive(Debug, Deserialize)]
pub struct LatestParams {
    pub limit: Option<usize>,
}

fn invalid_query(rejection: QueryRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

/// POST /api/vapi/generate
///
/// Called by the voice agent once it has collected the interview parameters.
/// An unreadable body is reported the same way as missing fields.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(request) = payload.map_err(|e| {
        warn!("Rejected generation body: {e}");
        missing_fields()
    })?;
    let request = request.validate()?;

    generate_interview(state.store.as_ref(), state.llm.as_ref(), request).await?;

    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

/// GET /api/vapi/generate
pub async fn handle_generate_ping() -> Json<Value> {
    Json(json!({ "success": true, "data": "Thank you!" }))
}

/// GET /api/interviews
///
/// The caller's own interviews, newest first unless `?order=oldest|unordered`.
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Interview>>, AppError> {
    let Query(params) = params.map_err(invalid_query)?;
    let interviews = get_interviews_by_user_id(state.store.as_ref(), &user.id, params.order).await?;
    Ok(Json(interviews))
}

/// GET /api/interviews/latest
///
/// Finalized interviews from other users, newest first.
pub async fn handle_latest_interviews(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    params: Result<Query<LatestParams>, QueryRejection>,
) -> Result<Json<Vec<Interview>>, AppError> {
    let Query(params) = params.map_err(invalid_query)?;
    let interviews = get_latest_interviews(state.store.as_ref(), &user.id, params.limit).await?;
    Ok(Json(interviews))
}

/// GET /api/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Interview>, AppError> {
    get_interview_by_id(state.store.as_ref(), &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
}
