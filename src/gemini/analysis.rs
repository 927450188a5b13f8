//! Core `CharacterAnalyst` trait and `GeminiAnalyst` implementation.
//!
//! `GeminiAnalyst` issues one `generateContent` request per query against the
//! generative-language REST API, constrained to the strict JSON schema from
//! [`crate::gemini::schema`]. All connection details come from
//! [`GeminiConfig`]; nothing is hardcoded.
//!
//! The operation performs no retry — offering a fresh attempt is the state
//! machine's job, via re-submission.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::GeminiConfig;
use crate::gemini::prompt::analysis_prompt;
use crate::gemini::schema::character_schema;
use crate::record::CharacterRecord;

// ---------------------------------------------------------------------------
// AnalysisError
// ---------------------------------------------------------------------------

/// Errors that can occur during character analysis.
///
/// The taxonomy exists for diagnostics only: the state machine collapses all
/// variants into one fixed user-facing message.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("analysis request timed out")]
    Timeout,

    /// The response carried no text payload at all.
    #[error("analysis response contained no text")]
    EmptyResponse,

    /// The text payload was not valid JSON, or the parsed record violated
    /// the schema (missing field, empty string, empty list).
    #[error("analysis response violated the schema: {0}")]
    SchemaInvalid(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AnalysisError::Timeout
        } else {
            AnalysisError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// CharacterAnalyst trait
// ---------------------------------------------------------------------------

/// Async trait for character analysis backends.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// behind an `Arc<dyn CharacterAnalyst>`.
///
/// The single-grapheme contract is carried in the signature: callers pass one
/// `char`. Deriving that character from free-form input (first character of
/// the trimmed text, rest discarded) is the submit guard's responsibility.
#[async_trait]
pub trait CharacterAnalyst: Send + Sync {
    async fn analyze(&self, character: char) -> Result<CharacterRecord, AnalysisError>;
}

// ---------------------------------------------------------------------------
// GeminiAnalyst
// ---------------------------------------------------------------------------

/// Calls the generative-language `models/{model}:generateContent` endpoint
/// with a strict response schema.
pub struct GeminiAnalyst {
    client: reqwest::Client,
    config: GeminiConfig,
    api_key: String,
}

impl GeminiAnalyst {
    /// Build a `GeminiAnalyst` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`. A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails. The API credential is
    /// resolved once, at construction (environment first, config second).
    pub fn from_config(config: &GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key: config.resolve_api_key().unwrap_or_default(),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl CharacterAnalyst for GeminiAnalyst {
    async fn analyze(&self, character: char) -> Result<CharacterRecord, AnalysisError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.analysis_model
        );

        let body = serde_json::json!({
            "contents": [
                { "parts": [{ "text": analysis_prompt(character) }] }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": character_schema()
            }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::SchemaInvalid(e.to_string()))?;

        record_from_response(&json)
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

/// Extract and validate a [`CharacterRecord`] from a `generateContent` reply.
///
/// The text payload lives at `candidates[0].content.parts[0].text`; its
/// absence is [`AnalysisError::EmptyResponse`]. The payload must parse as a
/// record and pass [`CharacterRecord::validate`].
fn record_from_response(json: &serde_json::Value) -> Result<CharacterRecord, AnalysisError> {
    let text = json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or(AnalysisError::EmptyResponse)?;

    let record: CharacterRecord =
        serde_json::from_str(text).map_err(|e| AnalysisError::SchemaInvalid(e.to_string()))?;

    record
        .validate()
        .map_err(|field| AnalysisError::SchemaInvalid(format!("empty field: {field}")))?;

    Ok(record)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
