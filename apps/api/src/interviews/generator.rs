//! Interview Generation: orchestrates the question-generation pipeline.
//!
//! Flow: build_question_prompt → model generate_text → extract_questions →
//!       shape InterviewRecord → single document insert.
//!
//! Steps run sequentially and nothing is written unless every step succeeds.
//! There is no compensation if the caller goes away between the model call
//! and the insert.

use tracing::{debug, error, info};

use crate::errors::AppError;
use crate::interviews::covers::random_interview_cover;
use crate::interviews::models::{
    parse_techstack, InterviewRecord, QuestionRequest, INTERVIEWS_COLLECTION,
};
use crate::interviews::parser::extract_questions;
use crate::interviews::prompts::build_question_prompt;
use crate::llm_client::LanguageModel;
use crate::models::iso_now;
use crate::store::{to_body, DocumentStore};

/// Runs the generation pipeline and returns the new interview's id.
pub async fn generate_interview(
    store: &dyn DocumentStore,
    llm: &dyn LanguageModel,
    request: QuestionRequest,
) -> Result<String, AppError> {
    // Step 1: Prompt
    let prompt = build_question_prompt(&request);

    // Step 2: Model call
    info!(
        "Generating {} questions for user {} ({}, {})",
        request.amount, request.user_id, request.role, request.level
    );
    let raw_questions = llm.generate_text(&prompt, None).await?;
    debug!("Raw model response: {raw_questions}");

    // Step 3: Extract
    let questions = extract_questions(&raw_questions, request.amount).map_err(|e| {
        error!("Error parsing AI response: {e}; raw response: {raw_questions}");
        AppError::ResponseParse(e.to_string())
    })?;

    // Step 4: Persist
    let interview = InterviewRecord {
        role: request.role,
        interview_type: request.interview_type,
        level: request.level,
        techstack: parse_techstack(&request.techstack),
        questions,
        user_id: request.user_id,
        finalized: true,
        cover_image: random_interview_cover(),
        created_at: iso_now(),
    };

    let id = store.add(INTERVIEWS_COLLECTION, to_body(&interview)?).await?;
    info!(
        "Interview {} saved with {} questions",
        id,
        interview.questions.len()
    );

    Ok(id)
}
