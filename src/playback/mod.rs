//! Audio playback — payload decoding and single-slot playback coordination.
//!
//! # Pipeline
//!
//! ```text
//! read_aloud(text) → SpeechSynthesizer (base64) → decode_base64_pcm
//!                  → AudioSink (audio-playback thread, one output stream)
//! ```
//!
//! At most one sentence is fetched-and-played at any time; overlapping
//! requests are dropped, not queued. See [`PlaybackCoordinator`].

pub mod coordinator;
pub mod pcm;

pub use coordinator::{AudioSink, PlaybackCoordinator, PlaybackError, RodioSink};
pub use pcm::{decode_base64_pcm, PcmError};
