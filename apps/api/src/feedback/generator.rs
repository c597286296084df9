//! Feedback Generation: structured evaluation of an interview transcript.
//!
//! Flow: format transcript → build prompt → structured model call →
//!       decode + validate → upsert (explicit id) or insert (fresh id).
//!
//! A decoded object that fails validation is rejected before anything is written.

use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::feedback::models::{
    feedback_schema, FeedbackAssessment, FeedbackRecord, TranscriptMessage, FEEDBACK_COLLECTION,
};
use crate::feedback::prompts::{build_feedback_prompt, format_transcript};
use crate::llm_client::prompts::INTERVIEWER_SYSTEM;
use crate::llm_client::{LanguageModel, LlmError};
use crate::models::iso_now;
use crate::store::{to_body, DocumentStore};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackParams {
    pub interview_id: String,
    pub user_id: String,
    pub transcript: Vec<TranscriptMessage>,
    /// Overwrite this record instead of creating a new one.
    pub feedback_id: Option<String>,
}

/// Generates, validates and stores feedback. Returns the effective feedback id.
pub async fn create_feedback(
    store: &dyn DocumentStore,
    llm: &dyn LanguageModel,
    params: CreateFeedbackParams,
) -> Result<String, AppError> {
    let prompt = build_feedback_prompt(&format_transcript(&params.transcript));

    let object = llm
        .generate_object(&prompt, INTERVIEWER_SYSTEM, &feedback_schema())
        .await?;

    let assessment: FeedbackAssessment =
        serde_json::from_value(object).map_err(LlmError::Parse)?;
    assessment.validate().map_err(|e| {
        error!(
            "Rejected feedback for interview {}: {e}",
            params.interview_id
        );
        LlmError::InvalidOutput(e.to_string())
    })?;

    let feedback = FeedbackRecord {
        interview_id: params.interview_id,
        user_id: params.user_id,
        assessment,
        created_at: iso_now(),
    };
    let body = to_body(&feedback)?;

    let id = match params.feedback_id {
        Some(id) => {
            store.set(FEEDBACK_COLLECTION, &id, body).await?;
            id
        }
        None => store.add(FEEDBACK_COLLECTION, body).await?,
    };

    info!(
        "Feedback {} saved for interview {} (total score {})",
        id, feedback.interview_id, feedback.assessment.total_score
    );
    Ok(id)
}
