use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::store::Document;

pub const FEEDBACK_COLLECTION: &str = "feedback";

/// One line of the interview transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: String,
    pub content: String,
}

/// Scores (0–100) for the fixed evaluation categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    pub communication_skills: f64,
    pub technical_knowledge: f64,
    pub problem_solving: f64,
    pub cultural_fit: f64,
    pub confidence_and_clarity: f64,
}

impl CategoryScores {
    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("communicationSkills", self.communication_skills),
            ("technicalKnowledge", self.technical_knowledge),
            ("problemSolving", self.problem_solving),
            ("culturalFit", self.cultural_fit),
            ("confidenceAndClarity", self.confidence_and_clarity),
        ]
    }
}

/// The model's structured evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAssessment {
    pub total_score: f64,
    pub category_scores: CategoryScores,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum FeedbackValidationError {
    #[error("{field} score {value} is outside 0-100")]
    ScoreOutOfRange { field: &'static str, value: f64 },

    #[error("finalAssessment is empty")]
    EmptyAssessment,
}

impl FeedbackAssessment {
    /// Checks what the schema alone cannot: score ranges and a non-empty verdict.
    pub fn validate(&self) -> Result<(), FeedbackValidationError> {
        let scores = std::iter::once(("totalScore", self.total_score))
            .chain(self.category_scores.named());

        for (field, value) in scores {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(FeedbackValidationError::ScoreOutOfRange { field, value });
            }
        }

        if self.final_assessment.trim().is_empty() {
            return Err(FeedbackValidationError::EmptyAssessment);
        }

        Ok(())
    }
}

/// Stored body of a feedback document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub interview_id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub assessment: FeedbackAssessment,
    pub created_at: String,
}

pub type Feedback = Document<FeedbackRecord>;

/// Response schema sent with the structured generation call.
pub fn feedback_schema() -> Value {
    let score = json!({ "type": "NUMBER" });
    let strings = json!({ "type": "ARRAY", "items": { "type": "STRING" } });

    json!({
        "type": "OBJECT",
        "properties": {
            "totalScore": score,
            "categoryScores": {
                "type": "OBJECT",
                "properties": {
                    "communicationSkills": score,
                    "technicalKnowledge": score,
                    "problemSolving": score,
                    "culturalFit": score,
                    "confidenceAndClarity": score
                },
                "required": [
                    "communicationSkills",
                    "technicalKnowledge",
                    "problemSolving",
                    "culturalFit",
                    "confidenceAndClarity"
                ]
            },
            "strengths": strings,
            "areasForImprovement": strings,
            "finalAssessment": { "type": "STRING" }
        },
        "required": [
            "totalScore",
            "categoryScores",
            "strengths",
            "areasForImprovement",
            "finalAssessment"
        ]
    })
}

#[cfg(test)]
pub(crate) fn sample_assessment() -> FeedbackAssessment {
    FeedbackAssessment {
        total_score: 72.0,
        category_scores: CategoryScores {
            communication_skills: 80.0,
            technical_knowledge: 65.0,
            problem_solving: 70.0,
            cultural_fit: 75.0,
            confidence_and_clarity: 68.0,
        },
        strengths: vec!["Clear explanations".to_string()],
        areas_for_improvement: vec!["Deeper knowledge of indexing".to_string()],
        final_assessment: "Solid junior candidate.".to_string(),
    }
}
