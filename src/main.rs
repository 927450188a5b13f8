//! Application entry point — 墨韵 · 字源 character explorer.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the Gemini clients and the playback coordinator.
//! 5. Create session channels (`command`, `result`).
//! 6. Spawn the session orchestrator on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use tokio::sync::mpsc;

use hanzi_etymology::{
    app::HanziApp,
    config::{AppConfig, API_KEY_ENV},
    gemini::{CharacterAnalyst, GeminiAnalyst, GeminiSpeech, SpeechSynthesizer},
    playback::{AudioSink, PlaybackCoordinator, RodioSink},
    query::{run_session, QueryCommand, QueryResult},
    strokes::{CdnStrokeSource, StrokeDataSource},
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_title("墨韵 · 字源")
        .with_inner_size([1000.0, 760.0])
        .with_min_inner_size([640.0, 480.0]);

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("character explorer starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    if config.gemini.resolve_api_key().is_none() {
        log::warn!("{API_KEY_ENV} is not set; analysis and read-aloud requests will fail");
    }

    // 3. Tokio runtime (2 worker threads — analysis + speech each take one)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Network clients + playback coordinator
    let analyst: Arc<dyn CharacterAnalyst> = Arc::new(GeminiAnalyst::from_config(&config.gemini));
    let synth: Arc<dyn SpeechSynthesizer> = Arc::new(GeminiSpeech::from_config(&config.gemini));
    let sink: Arc<dyn AudioSink> = Arc::new(RodioSink::new());
    let strokes: Arc<dyn StrokeDataSource> = Arc::new(CdnStrokeSource::from_config(&config.strokes));

    let playback = Arc::new(PlaybackCoordinator::new(
        synth,
        sink,
        config.playback.sample_rate,
    ));

    // 5. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<QueryCommand>(16);
    let (result_tx, result_rx) = mpsc::channel::<QueryResult>(32);

    // 6. Spawn session orchestrator onto the tokio runtime
    rt.spawn(run_session(
        analyst,
        strokes,
        Arc::clone(&playback),
        command_rx,
        result_tx,
    ));

    // 7. Build the egui app and run it (blocks until the window is closed)
    let app = HanziApp::new(command_tx, result_rx, playback, config.clone());
    let options = native_options(&config);

    eframe::run_native(
        "墨韵 · 字源",
        options,
        Box::new(move |cc| {
            HanziApp::install_cjk_fonts(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
}
