//! 墨韵 · 字源 — Chinese character etymology explorer.
//!
//! A desktop application that analyses a single Chinese character through a
//! schema-constrained Gemini request, reads example sentences aloud through
//! the Gemini TTS endpoint, and renders pedagogical stroke-order practice
//! from the public hanzi-writer dataset.
//!
//! # Architecture
//!
//! ```text
//! egui UI (HanziApp, QueryState) ──QueryCommand──▶ session orchestrator (tokio)
//!        ◀──QueryResult──                          ├─ CharacterAnalyst (Gemini)
//!                                                  ├─ StrokeDataSource (CDN)
//!                                                  └─ PlaybackCoordinator
//!                                                        ├─ SpeechSynthesizer (Gemini TTS)
//!                                                        └─ AudioSink (rodio thread)
//! ```
//!
//! The UI thread polls the result channel each frame; every command runs as
//! its own task, and a monotonically increasing request token keeps stale
//! analysis responses from overwriting newer state.

pub mod app;
pub mod config;
pub mod gemini;
pub mod playback;
pub mod query;
pub mod record;
pub mod strokes;
