//! Playback coordination — at most one sentence fetched-and-played at a time.
//!
//! [`PlaybackCoordinator`] owns the *active marker*: the sentence currently
//! being synthesized or played, or none. A read-aloud call that arrives while
//! another is active is a silent no-op — it does not queue, cancel or error.
//! The marker is cleared on every exit path (natural end, synthesis failure,
//! decode failure, output failure); failures are logged and nothing further
//! is surfaced, so the triggering control re-enables purely by observing the
//! cleared marker.
//!
//! [`AudioSink`] is the seam to the platform audio facility. The production
//! implementation, [`RodioSink`], lazily spawns one `audio-playback` thread
//! that owns a single process-wide output stream, created once and reused for
//! every playback.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, OnceLock};

use rodio::buffer::SamplesBuffer;
use thiserror::Error;

use crate::gemini::speech::{SpeechError, SpeechSynthesizer};
use crate::playback::pcm::{decode_base64_pcm, PcmError};

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

/// Errors that can occur on the synthesize → decode → play path.
///
/// These never reach the user; they are logged and the active marker is
/// cleared.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The speech request failed.
    #[error(transparent)]
    Synthesis(#[from] SpeechError),

    /// The returned payload could not be decoded into PCM samples.
    #[error(transparent)]
    Decode(#[from] PcmError),

    /// The audio output device rejected or dropped the playback.
    #[error("audio output error: {0}")]
    Output(String),
}

// ---------------------------------------------------------------------------
// AudioSink trait
// ---------------------------------------------------------------------------

/// Platform audio output seam.
///
/// `play` submits mono PCM samples and blocks the calling thread until
/// playback reaches its natural end. Implementations must be `Send + Sync`;
/// the coordinator calls them from `spawn_blocking`.
pub trait AudioSink: Send + Sync {
    fn play(&self, samples: Vec<i16>, sample_rate: u32) -> Result<(), PlaybackError>;
}

// ---------------------------------------------------------------------------
// RodioSink
// ---------------------------------------------------------------------------

struct PlaybackJob {
    samples: Vec<i16>,
    sample_rate: u32,
    done: mpsc::Sender<Result<(), String>>,
}

/// Audio output backed by a single process-wide rodio stream.
///
/// The `audio-playback` thread (and the output stream it owns) is spawned
/// lazily on the first playback and reused for every subsequent one. Jobs are
/// naturally serialized by the thread's queue, although the coordinator's
/// active marker already guarantees at most one is in flight.
pub struct RodioSink {
    worker: OnceLock<mpsc::Sender<PlaybackJob>>,
}

impl RodioSink {
    pub fn new() -> Self {
        Self {
            worker: OnceLock::new(),
        }
    }

    fn worker(&self) -> &mpsc::Sender<PlaybackJob> {
        self.worker.get_or_init(|| {
            let (tx, rx) = mpsc::channel::<PlaybackJob>();
            std::thread::Builder::new()
                .name("audio-playback".into())
                .spawn(move || playback_thread(rx))
                .expect("failed to spawn audio-playback thread");
            tx
        })
    }
}

impl Default for RodioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for RodioSink {
    fn play(&self, samples: Vec<i16>, sample_rate: u32) -> Result<(), PlaybackError> {
        let (done_tx, done_rx) = mpsc::channel();
        self.worker()
            .send(PlaybackJob {
                samples,
                sample_rate,
                done: done_tx,
            })
            .map_err(|_| PlaybackError::Output("playback thread terminated".into()))?;

        match done_rx.recv() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(PlaybackError::Output(e)),
            Err(_) => Err(PlaybackError::Output("playback thread dropped the job".into())),
        }
    }
}

/// Body of the `audio-playback` thread.
///
/// Opens the default output stream once. If the device is unavailable every
/// job is failed with the same logged error; the stream is never re-probed
/// within a session.
fn playback_thread(rx: mpsc::Receiver<PlaybackJob>) {
    let (_stream, handle) = match rodio::OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            log::warn!("audio output unavailable: {e}");
            for job in rx {
                let _ = job.done.send(Err(format!("audio output unavailable: {e}")));
            }
            return;
        }
    };

    for job in rx {
        let result = match rodio::Sink::try_new(&handle) {
            Ok(sink) => {
                sink.append(SamplesBuffer::new(1, job.sample_rate, job.samples));
                sink.sleep_until_end();
                Ok(())
            }
            Err(e) => Err(e.to_string()),
        };
        let _ = job.done.send(result);
    }
}

// ---------------------------------------------------------------------------
// PlaybackCoordinator
// ---------------------------------------------------------------------------

/// Serializes read-aloud requests and tracks which sentence is active.
///
/// The active marker is an advisory gate: a plain check-and-set under one
/// mutex guard, which is sufficient because all read-aloud entry points run
/// on the cooperative runtime. In a preemptive setting the same field would
/// need a real try-lock.
pub struct PlaybackCoordinator {
    synth: Arc<dyn SpeechSynthesizer>,
    sink: Arc<dyn AudioSink>,
    active: Mutex<Option<String>>,
    sample_rate: u32,
}

impl PlaybackCoordinator {
    pub fn new(synth: Arc<dyn SpeechSynthesizer>, sink: Arc<dyn AudioSink>, sample_rate: u32) -> Self {
        Self {
            synth,
            sink,
            active: Mutex::new(None),
            sample_rate,
        }
    }

    /// The sentence currently being synthesized or played, if any.
    pub fn active_text(&self) -> Option<String> {
        self.active.lock().unwrap().clone()
    }

    /// Whether this specific sentence is the active one — drives the
    /// per-sentence loading affordance on the triggering control.
    pub fn is_active(&self, text: &str) -> bool {
        self.active.lock().unwrap().as_deref() == Some(text)
    }

    /// Synthesize `text`, decode it, and play it to the end.
    ///
    /// A no-op when any playback is already active. The active marker is
    /// cleared on **every** exit path; a decode failure after a successful
    /// synthesis must not leave the marker set, or read-aloud would deadlock
    /// for the rest of the session.
    pub async fn read_aloud(&self, text: &str) {
        {
            let mut active = self.active.lock().unwrap();
            if active.is_some() {
                log::debug!("playback already active; ignoring read-aloud request");
                return;
            }
            *active = Some(text.to_string());
        }

        if let Err(e) = self.play(text).await {
            log::warn!("read-aloud failed: {e}");
        }

        *self.active.lock().unwrap() = None;
    }

    async fn play(&self, text: &str) -> Result<(), PlaybackError> {
        let payload = self.synth.synthesize(text).await?;
        let samples = decode_base64_pcm(&payload)?;

        let sink = Arc::clone(&self.sink);
        let sample_rate = self.sample_rate;
        tokio::task::spawn_blocking(move || sink.play(samples, sample_rate))
            .await
            .map_err(|e| PlaybackError::Output(e.to_string()))?
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use base64::Engine as _;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Returns a fixed payload, optionally holding until released so tests
    /// can observe the coordinator mid-flight.
    struct StubSynth {
        payload: Result<String, ()>,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl SpeechSynthesizer for StubSynth {
        async fn synthesize(&self, _text: &str) -> Result<String, SpeechError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.payload
                .clone()
                .map_err(|_| SpeechError::NoAudio)
        }
    }

    /// Records every play call; never touches a real device.
    struct RecordingSink {
        plays: AtomicUsize,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                plays: AtomicUsize::new(0),
            })
        }
    }

    impl AudioSink for RecordingSink {
        fn play(&self, _samples: Vec<i16>, _sample_rate: u32) -> Result<(), PlaybackError> {
            self.plays.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn valid_payload() -> String {
        base64::engine::general_purpose::STANDARD.encode([0u8, 1, 2, 3])
    }

    fn coordinator(
        payload: Result<String, ()>,
        gate: Option<Arc<Notify>>,
        sink: Arc<RecordingSink>,
    ) -> Arc<PlaybackCoordinator> {
        Arc::new(PlaybackCoordinator::new(
            Arc::new(StubSynth { payload, gate }),
            sink,
            24_000,
        ))
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn marker_clears_after_natural_end() {
        let sink = RecordingSink::new();
        let coord = coordinator(Ok(valid_payload()), None, Arc::clone(&sink));

        coord.read_aloud("Hello").await;

        assert!(coord.active_text().is_none());
        assert_eq!(sink.plays.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_call_is_a_no_op_while_first_is_active() {
        let sink = RecordingSink::new();
        let gate = Arc::new(Notify::new());
        let coord = coordinator(Ok(valid_payload()), Some(Arc::clone(&gate)), Arc::clone(&sink));

        let first = {
            let coord = Arc::clone(&coord);
            tokio::spawn(async move { coord.read_aloud("Hello").await })
        };

        // Wait until the first call has claimed the marker.
        while !coord.is_active("Hello") {
            tokio::task::yield_now().await;
        }

        // The overlapping call returns immediately and changes nothing.
        coord.read_aloud("World").await;
        assert_eq!(coord.active_text().as_deref(), Some("Hello"));
        assert!(!coord.is_active("World"));

        gate.notify_one();
        first.await.unwrap();

        assert!(coord.active_text().is_none());
        assert_eq!(sink.plays.load(Ordering::SeqCst), 1, "World must never play");
    }

    #[tokio::test]
    async fn marker_clears_on_synthesis_failure() {
        let sink = RecordingSink::new();
        let coord = coordinator(Err(()), None, Arc::clone(&sink));

        coord.read_aloud("Hello").await;

        assert!(coord.active_text().is_none());
        assert_eq!(sink.plays.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn marker_clears_on_decode_failure() {
        // Synthesis "succeeds" but the payload is not base64 — the failure
        // path after a successful fetch must still release the gate.
        let sink = RecordingSink::new();
        let coord = coordinator(Ok("!!not-base64!!".into()), None, Arc::clone(&sink));

        coord.read_aloud("Hello").await;

        assert!(coord.active_text().is_none());
        assert_eq!(sink.plays.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn read_aloud_is_re_enabled_after_a_failure() {
        let sink = RecordingSink::new();
        let failing = coordinator(Ok("!!not-base64!!".into()), None, Arc::clone(&sink));
        failing.read_aloud("Hello").await;
        assert!(failing.active_text().is_none());

        let working = coordinator(Ok(valid_payload()), None, Arc::clone(&sink));
        working.read_aloud("Hello again").await;
        assert_eq!(sink.plays.load(Ordering::SeqCst), 1);
    }
}
