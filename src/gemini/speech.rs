//! Core `SpeechSynthesizer` trait and `GeminiSpeech` implementation.
//!
//! One request per sentence against the TTS model's `generateContent`
//! endpoint, scoped to audio output and a single fixed prebuilt voice. The
//! reply carries base64-encoded PCM in `inlineData`; decoding to samples is
//! the playback layer's job (see [`crate::playback::pcm`]).
//!
//! No retry, no caching: repeated requests for the same sentence re-synthesize
//! from scratch.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::GeminiConfig;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors that can occur during speech synthesis.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("speech request timed out")]
    Timeout,

    /// The response carried no inline audio payload.
    #[error("no audio data received")]
    NoAudio,
}

impl From<reqwest::Error> for SpeechError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for text-to-speech backends.
///
/// `synthesize` returns the **encoded** (base64) audio payload for the exact
/// text passed in; implementors must be `Send + Sync` so the coordinator can
/// hold them behind an `Arc<dyn SpeechSynthesizer>`.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<String, SpeechError>;
}

// ---------------------------------------------------------------------------
// GeminiSpeech
// ---------------------------------------------------------------------------

/// Calls the TTS model's `generateContent` endpoint with
/// `responseModalities: ["AUDIO"]` and the configured prebuilt voice.
pub struct GeminiSpeech {
    client: reqwest::Client,
    config: GeminiConfig,
    api_key: String,
}

impl GeminiSpeech {
    /// Build a `GeminiSpeech` from application config.
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
impl SpeechSynthesizer for GeminiSpeech {
    async fn synthesize(&self, text: &str) -> Result<String, SpeechError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.speech_model
        );

        let body = serde_json::json!({
            "contents": [
                { "parts": [{ "text": text }] }
            ],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.config.voice }
                    }
                }
            }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let json: serde_json::Value = response.json().await?;

        audio_from_response(&json)
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

/// Extract the base64 audio payload from a `generateContent` reply.
///
/// The payload lives at `candidates[0].content.parts[0].inlineData.data`;
/// its absence is [`SpeechError::NoAudio`].
fn audio_from_response(json: &serde_json::Value) -> Result<String, SpeechError> {
    json["candidates"][0]["content"]["parts"][0]["inlineData"]["data"]
        .as_str()
        .filter(|data| !data.is_empty())
        .map(|data| data.to_string())
        .ok_or(SpeechError::NoAudio)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_config_builds_without_panic() {
        let _speech = GeminiSpeech::from_config(&GeminiConfig::default());
    }

    /// Verify that `GeminiSpeech` is object-safe (usable as `dyn SpeechSynthesizer`).
    #[test]
    fn synthesizer_is_object_safe() {
        let speech: Box<dyn SpeechSynthesizer> =
            Box::new(GeminiSpeech::from_config(&GeminiConfig::default()));
        drop(speech);
    }

    #[test]
    fn inline_data_is_extracted() {
        let response = json!({
            "candidates": [
                { "content": { "parts": [
                    { "inlineData": { "mimeType": "audio/pcm", "data": "AAAA" } }
                ] } }
            ]
        });
        assert_eq!(audio_from_response(&response).unwrap(), "AAAA");
    }

    #[test]
    fn missing_inline_data_is_no_audio() {
        let response = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "no audio here" }] } }
            ]
        });
        assert!(matches!(
            audio_from_response(&response),
            Err(SpeechError::NoAudio)
        ));
    }

    #[test]
    fn empty_payload_is_no_audio() {
        let response = json!({
            "candidates": [
                { "content": { "parts": [
                    { "inlineData": { "data": "" } }
                ] } }
            ]
        });
        assert!(matches!(
            audio_from_response(&response),
            Err(SpeechError::NoAudio)
        ));
    }

    #[test]
    fn empty_candidate_list_is_no_audio() {
        let response = json!({ "candidates": [] });
        assert!(matches!(
            audio_from_response(&response),
            Err(SpeechError::NoAudio)
        ));
    }
}
