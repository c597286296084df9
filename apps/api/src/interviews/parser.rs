//! Question extraction from free-form model output.
//!
//! Best-effort and fail-closed: takes the span from the first `[` to the last
//! `]`, decodes it strictly, and truncates (never pads) to the requested
//! amount. Several arrays, or prose between brackets, make the span
//! undecodable and the whole request fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static ARRAY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[\s\S]*\]").expect("array pattern is a valid regex"));

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("No valid JSON array found in model response")]
    NoArray,

    #[error("Matched text is not valid JSON: {0}")]
    Decode(String),

    #[error("Parsed model output is not an array")]
    NotAnArray,

    #[error("Array element {0} is not a string")]
    NotAString(usize),
}

/// Extracts at most `amount` question strings from raw model text.
pub fn extract_questions(raw: &str, amount: usize) -> Result<Vec<String>, ParseError> {
    let matched = ARRAY_PATTERN.find(raw).ok_or(ParseError::NoArray)?;

    let parsed: Value =
        serde_json::from_str(matched.as_str()).map_err(|e| ParseError::Decode(e.to_string()))?;

    let Value::Array(items) = parsed else {
        return Err(ParseError::NotAnArray);
    };

    items
        .into_iter()
        .take(amount)
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(question) => Ok(question),
            _ => Err(ParseError::NotAString(i)),
        })
        .collect()
}
