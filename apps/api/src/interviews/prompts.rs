// Prompt construction for question generation.
// Inputs are interpolated verbatim; callers exposing this publicly must treat
// them as untrusted.

use crate::interviews::models::QuestionRequest;
use crate::llm_client::prompts::JSON_ARRAY_ONLY;

/// Builds the question-generation prompt. Pure function of the request.
pub fn build_question_prompt(request: &QuestionRequest) -> String {
    format!(
        "{JSON_ARRAY_ONLY}

Prepare {amount} interview questions for a job interview.
The job role is: {role}.
The experience level is: {level}.
The tech stack used in the job is: {techstack}.
",
        amount = request.amount,
        role = request.role,
        level = request.level,
        techstack = request.techstack,
    )
}
