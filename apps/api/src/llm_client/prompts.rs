// Shared prompt constants.
// Each service that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Opening line for prompts whose output is parsed as a bare JSON array.
pub const JSON_ARRAY_ONLY: &str =
    "Respond ONLY with a valid JSON array of strings, and nothing else.";

/// System prompt shared by the evaluation calls.
pub const INTERVIEWER_SYSTEM: &str =
    "You are a professional interviewer analyzing a mock interview.";
