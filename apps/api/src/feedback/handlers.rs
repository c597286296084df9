//! Axum route handlers for the Feedback API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::AppError;
use crate::feedback::generator::{create_feedback, CreateFeedbackParams};
use crate::feedback::models::{Feedback, TranscriptMessage};
use crate::feedback::queries::get_feedback_by_interview_id;
use crate::identity::SessionUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    pub transcript: Vec<TranscriptMessage>,
    pub feedback_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
}

/// POST /api/interviews/:id/feedback
///
/// Failures are logged and reported as `{success: false}` with status 200.
pub async fn handle_create_feedback(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(interview_id): Path<String>,
    Json(request): Json<CreateFeedbackRequest>,
) -> Json<CreateFeedbackResponse> {
    let params = CreateFeedbackParams {
        interview_id,
        user_id: user.id,
        transcript: request.transcript,
        feedback_id: request.feedback_id,
    };

    match create_feedback(state.store.as_ref(), state.llm.as_ref(), params).await {
        Ok(feedback_id) => Json(CreateFeedbackResponse {
            success: true,
            feedback_id: Some(feedback_id),
        }),
        Err(e) => {
            error!("Error saving feedback: {e}");
            Json(CreateFeedbackResponse {
                success: false,
                feedback_id: None,
            })
        }
    }
}

/// GET /api/interviews/:id/feedback
///
/// The caller's feedback for the interview.
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(interview_id): Path<String>,
) -> Result<Json<Feedback>, AppError> {
    get_feedback_by_interview_id(state.store.as_ref(), &interview_id, &user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No feedback for interview {interview_id}")))
}
