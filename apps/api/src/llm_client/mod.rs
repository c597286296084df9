/// LLM Client: the single point of entry for all hosted-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions MUST go through the `LanguageModel` trait.
///
/// Calls are single-shot: no retry, and no timeout beyond the transport default.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all generation calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.0-flash-001";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM output failed validation: {0}")]
    InvalidOutput(String),
}

/// Text and structured generation, the two invocation modes the pipelines need.
///
/// Carried in `AppState` as `Arc<dyn LanguageModel>`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Free-form completion. The output carries no schema guarantee.
    async fn generate_text(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError>;

    /// Schema-constrained completion, decoded as JSON.
    /// Conformance to `schema` is the endpoint's promise, not checked here.
    async fn generate_object(
        &self,
        prompt: &str,
        system: &str,
        schema: &Value,
    ) -> Result<Value, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Why the first candidate stopped, e.g. `STOP` or `MAX_TOKENS`.
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The hosted-model client used by the generation and feedback pipelines.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Makes a raw `generateContent` call, returning the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        system: Option<&str>,
        generation_config: Option<GenerationConfigArgs<'_>>,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = build_request(prompt, system, generation_config);

        let response = self
            .client
            .post(format!("{GEMINI_API_BASE}/{MODEL}:generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }
        if let Some(reason) = llm_response.finish_reason().filter(|r| *r != "STOP") {
            warn!("LLM candidate finished early: {reason}");
        }

        Ok(llm_response)
    }
}

/// Response-format constraints for structured generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationConfigArgs<'a> {
    pub response_mime_type: &'a str,
    pub response_schema: &'a Value,
}

fn build_request<'a>(
    prompt: &'a str,
    system: Option<&'a str>,
    generation_config: Option<GenerationConfigArgs<'a>>,
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part { text: prompt }],
        }],
        system_instruction: system.map(|text| Content {
            role: None,
            parts: vec![Part { text }],
        }),
        generation_config: generation_config.map(|c| GenerationConfig {
            response_mime_type: c.response_mime_type,
            response_schema: c.response_schema,
        }),
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn generate_text(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        let response = self.call(prompt, system, None).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }

    async fn generate_object(
        &self,
        prompt: &str,
        system: &str,
        schema: &Value,
    ) -> Result<Value, LlmError> {
        let config = GenerationConfigArgs {
            response_mime_type: "application/json",
            response_schema: schema,
        };
        let response = self.call(prompt, Some(system), Some(config)).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
