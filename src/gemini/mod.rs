//! Gemini network clients for the character explorer.
//!
//! This module provides:
//! * [`CharacterAnalyst`] — async trait implemented by analysis backends.
//! * [`GeminiAnalyst`] — schema-constrained `generateContent` analysis client.
//! * [`SpeechSynthesizer`] — async trait implemented by TTS backends.
//! * [`GeminiSpeech`] — audio-modality `generateContent` TTS client.
//! * [`prompt`] — the palaeographer analysis instruction.
//! * [`schema`] — the strict response schema for [`CharacterRecord`].
//! * [`AnalysisError`] / [`SpeechError`] — per-client error variants.
//!
//! Both clients issue exactly one request per call. Retry is deliberately
//! absent: analysis retries happen through user re-submission, and speech is
//! re-synthesized on every read-aloud.
//!
//! [`CharacterRecord`]: crate::record::CharacterRecord

pub mod analysis;
pub mod prompt;
pub mod schema;
pub mod speech;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use analysis::{AnalysisError, CharacterAnalyst, GeminiAnalyst};
pub use speech::{GeminiSpeech, SpeechError, SpeechSynthesizer};
