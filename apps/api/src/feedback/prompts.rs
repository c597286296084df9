// Prompt construction for transcript evaluation.

use crate::feedback::models::TranscriptMessage;

/// One `- {role}: {content}` line per message, in order.
pub fn format_transcript(transcript: &[TranscriptMessage]) -> String {
    transcript
        .iter()
        .map(|m| format!("- {}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the evaluation prompt for a formatted transcript.
pub fn build_feedback_prompt(formatted_transcript: &str) -> String {
    format!(
        "You are an AI interviewer analyzing a mock interview. Your task is to evaluate the candidate based on structured categories. Be thorough and detailed in your analysis. Don't be lenient with the candidate. If there are mistakes or areas for improvement, point them out.

Transcript:
{formatted_transcript}

Please score the candidate from 0 to 100 in the following areas:
- Communication Skills: Clarity, articulation, structured responses.
- Technical Knowledge: Understanding of key concepts for the role.
- Problem-Solving: Ability to analyze problems and propose solutions.
- Cultural & Role Fit: Alignment with company values and job role.
- Confidence & Clarity: Confidence in responses, engagement, and clarity.
"
    )
}
