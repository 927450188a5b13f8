//! Session orchestrator — drives the network clients for the UI.
//!
//! Runs inside the tokio runtime. Listens for [`QueryCommand`]s from the UI
//! thread, performs the corresponding network operation on an independent
//! task, and emits [`QueryResult`]s back.
//!
//! Each command spawns its own task, so a re-submission never waits for an
//! in-flight analysis: both requests proceed and the state machine's token
//! fence decides which completion sticks. Read-aloud concurrency is resolved
//! inside [`PlaybackCoordinator`] (overlapping requests are dropped).

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::gemini::CharacterAnalyst;
use crate::playback::PlaybackCoordinator;
use crate::record::CharacterRecord;
use crate::strokes::{StrokeData, StrokeDataSource};

// ---------------------------------------------------------------------------
// Command / result messages
// ---------------------------------------------------------------------------

/// Commands sent from the UI thread to the session orchestrator.
#[derive(Debug, Clone)]
pub enum QueryCommand {
    /// Analyze one character; `token` fences the response against
    /// re-submissions.
    Analyze { token: u64, character: char },
    /// Read one sentence aloud. Dropped silently if playback is busy.
    ReadAloud { text: String },
    /// Fetch stroke data for the practice widget.
    FetchStrokes { character: char },
}

/// Results delivered from the orchestrator back to the UI.
#[derive(Debug, Clone)]
pub enum QueryResult {
    /// Analysis succeeded; the record is validated and complete.
    AnalysisComplete {
        token: u64,
        record: CharacterRecord,
    },
    /// Analysis failed for any reason; the UI shows one fixed message.
    AnalysisFailed { token: u64 },
    /// Stroke data arrived for `character`.
    StrokesLoaded {
        character: char,
        data: StrokeData,
    },
    /// Stroke data is unavailable for `character`.
    StrokesFailed { character: char },
}

// ---------------------------------------------------------------------------
// Orchestrator loop
// ---------------------------------------------------------------------------

/// Run the session orchestrator until the command channel closes.
pub async fn run_session(
    analyst: Arc<dyn CharacterAnalyst>,
    strokes: Arc<dyn StrokeDataSource>,
    playback: Arc<PlaybackCoordinator>,
    mut command_rx: mpsc::Receiver<QueryCommand>,
    result_tx: mpsc::Sender<QueryResult>,
) {
    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            QueryCommand::Analyze { token, character } => {
                let analyst = Arc::clone(&analyst);
                let tx = result_tx.clone();
                tokio::spawn(async move {
                    let result = match analyst.analyze(character).await {
                        Ok(record) => QueryResult::AnalysisComplete { token, record },
                        Err(e) => {
                            log::warn!("analysis of '{character}' failed: {e}");
                            QueryResult::AnalysisFailed { token }
                        }
                    };
                    let _ = tx.send(result).await;
                });
            }

            QueryCommand::ReadAloud { text } => {
                let playback = Arc::clone(&playback);
                tokio::spawn(async move {
                    playback.read_aloud(&text).await;
                });
            }

            QueryCommand::FetchStrokes { character } => {
                let strokes = Arc::clone(&strokes);
                let tx = result_tx.clone();
                tokio::spawn(async move {
                    let result = match strokes.fetch(character).await {
                        Ok(data) => QueryResult::StrokesLoaded { character, data },
                        Err(e) => {
                            log::warn!("stroke data for '{character}' unavailable: {e}");
                            QueryResult::StrokesFailed { character }
                        }
                    };
                    let _ = tx.send(result).await;
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::analysis::AnalysisError;
    use crate::playback::coordinator::{AudioSink, PlaybackError};
    use crate::gemini::speech::{SpeechError, SpeechSynthesizer};
    use crate::strokes::StrokeError;
    use async_trait::async_trait;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    struct StubAnalyst {
        ok: bool,
    }

    #[async_trait]
    impl CharacterAnalyst for StubAnalyst {
        async fn analyze(&self, _character: char) -> Result<CharacterRecord, AnalysisError> {
            if self.ok {
                Ok(serde_json::from_str(crate::record::gui_json()).unwrap())
            } else {
                Err(AnalysisError::EmptyResponse)
            }
        }
    }

    struct StubStrokes;

    #[async_trait]
    impl StrokeDataSource for StubStrokes {
        async fn fetch(&self, _character: char) -> Result<StrokeData, StrokeError> {
            Err(StrokeError::Missing)
        }
    }

    struct SilentSynth;

    #[async_trait]
    impl SpeechSynthesizer for SilentSynth {
        async fn synthesize(&self, _text: &str) -> Result<String, SpeechError> {
            Err(SpeechError::NoAudio)
        }
    }

    struct NullSink;

    impl AudioSink for NullSink {
        fn play(&self, _samples: Vec<i16>, _sample_rate: u32) -> Result<(), PlaybackError> {
            Ok(())
        }
    }

    fn spawn_runner(
        ok: bool,
    ) -> (mpsc::Sender<QueryCommand>, mpsc::Receiver<QueryResult>) {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (result_tx, result_rx) = mpsc::channel(16);
        let playback = Arc::new(PlaybackCoordinator::new(
            Arc::new(SilentSynth),
            Arc::new(NullSink),
            24_000,
        ));
        tokio::spawn(run_session(
            Arc::new(StubAnalyst { ok }),
            Arc::new(StubStrokes),
            playback,
            command_rx,
            result_tx,
        ));
        (command_tx, result_rx)
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn analyze_success_round_trips_the_token() {
        let (tx, mut rx) = spawn_runner(true);
        tx.send(QueryCommand::Analyze {
            token: 7,
            character: '龟',
        })
        .await
        .unwrap();

        match rx.recv().await.unwrap() {
            QueryResult::AnalysisComplete { token, record } => {
                assert_eq!(token, 7);
                assert_eq!(record.character, "龟");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn analyze_failure_carries_only_the_token() {
        let (tx, mut rx) = spawn_runner(false);
        tx.send(QueryCommand::Analyze {
            token: 3,
            character: '道',
        })
        .await
        .unwrap();

        match rx.recv().await.unwrap() {
            QueryResult::AnalysisFailed { token } => assert_eq!(token, 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn stroke_fetch_failure_names_the_character() {
        let (tx, mut rx) = spawn_runner(true);
        tx.send(QueryCommand::FetchStrokes { character: '墨' })
            .await
            .unwrap();

        match rx.recv().await.unwrap() {
            QueryResult::StrokesFailed { character } => assert_eq!(character, '墨'),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
