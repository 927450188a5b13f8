//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable holding the API credential. Takes precedence over
/// the config file so the key never has to be written to disk.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// ---------------------------------------------------------------------------
// GeminiConfig
// ---------------------------------------------------------------------------

/// Settings for the Gemini analysis and speech clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key — `None` means rely on the `GEMINI_API_KEY` environment
    /// variable.
    pub api_key: Option<String>,
    /// Base URL of the generative-language endpoint.
    pub base_url: String,
    /// Model identifier used for character analysis.
    pub analysis_model: String,
    /// Model identifier used for text-to-speech.
    pub speech_model: String,
    /// Prebuilt voice name for speech synthesis.
    pub voice: String,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".into(),
            analysis_model: "gemini-2.5-flash".into(),
            speech_model: "gemini-2.5-flash-preview-tts".into(),
            voice: "Puck".into(),
            timeout_secs: 60,
        }
    }
}

impl GeminiConfig {
    /// Resolve the API credential: environment first, config file second.
    ///
    /// Empty strings count as unset in both places.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }
}

fn resolve_key(env: Option<String>, file: Option<&str>) -> Option<String> {
    env.filter(|k| !k.trim().is_empty())
        .or_else(|| file.map(str::to_string).filter(|k| !k.trim().is_empty()))
}

// ---------------------------------------------------------------------------
// PlaybackConfig
// ---------------------------------------------------------------------------

/// Settings for audio playback of synthesized speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Sample rate in Hz of the PCM audio the speech endpoint returns.
    pub sample_rate: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
        }
    }
}

// ---------------------------------------------------------------------------
// StrokeConfig
// ---------------------------------------------------------------------------

/// Settings for the stroke-order data source and practice widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeConfig {
    /// Base URL of the per-character stroke-data files.
    pub data_url: String,
    /// Maximum seconds to wait for a stroke-data file.
    pub timeout_secs: u64,
    /// Seconds to draw one stroke during animation.
    pub stroke_secs: f32,
    /// Seconds of pause between strokes during animation.
    pub delay_secs: f32,
    /// Mean-distance threshold (unit coordinates) under which a drawn
    /// stroke counts as matching the expected one in quiz mode.
    pub match_threshold: f32,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            data_url: "https://cdn.jsdelivr.net/npm/hanzi-writer-data@2.0".into(),
            timeout_secs: 10,
            stroke_secs: 0.5,
            delay_secs: 0.2,
            match_threshold: 0.15,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance and behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Last saved window position `(x, y)` in screen pixels. `None` means
    /// let the OS / window manager pick a position on first launch.
    pub window_position: Option<(f32, f32)>,
    /// Suggested characters shown below the empty input field.
    pub suggestions: Vec<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_position: None,
            suggestions: ["龙", "道", "禅", "雨", "墨"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use hanzi_etymology::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini client settings.
    pub gemini: GeminiConfig,
    /// Audio playback settings.
    pub playback: PlaybackConfig,
    /// Stroke-order data and widget settings.
    pub strokes: StrokeConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.gemini.base_url, loaded.gemini.base_url);
        assert_eq!(original.gemini.api_key, loaded.gemini.api_key);
        assert_eq!(original.gemini.analysis_model, loaded.gemini.analysis_model);
        assert_eq!(original.gemini.speech_model, loaded.gemini.speech_model);
        assert_eq!(original.gemini.voice, loaded.gemini.voice);
        assert_eq!(original.gemini.timeout_secs, loaded.gemini.timeout_secs);
        assert_eq!(original.playback.sample_rate, loaded.playback.sample_rate);
        assert_eq!(original.strokes.data_url, loaded.strokes.data_url);
        assert_eq!(
            original.strokes.match_threshold,
            loaded.strokes.match_threshold
        );
        assert_eq!(original.ui.suggestions, loaded.ui.suggestions);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.gemini.analysis_model, default.gemini.analysis_model);
        assert_eq!(config.playback.sample_rate, default.playback.sample_rate);
        assert_eq!(config.ui.suggestions, default.ui.suggestions);
    }

    /// Verify default values.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert!(cfg.gemini.api_key.is_none());
        assert_eq!(
            cfg.gemini.base_url,
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(cfg.gemini.analysis_model, "gemini-2.5-flash");
        assert_eq!(cfg.gemini.speech_model, "gemini-2.5-flash-preview-tts");
        assert_eq!(cfg.gemini.voice, "Puck");
        assert_eq!(cfg.playback.sample_rate, 24_000);
        assert!(cfg.strokes.data_url.contains("hanzi-writer-data"));
        assert_eq!(cfg.ui.suggestions.len(), 5);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.gemini.api_key = Some("test-key".into());
        cfg.gemini.analysis_model = "gemini-2.5-pro".into();
        cfg.gemini.voice = "Kore".into();
        cfg.gemini.timeout_secs = 30;
        cfg.strokes.stroke_secs = 0.8;
        cfg.ui.window_position = Some((100.0, 200.0));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.gemini.api_key, Some("test-key".into()));
        assert_eq!(loaded.gemini.analysis_model, "gemini-2.5-pro");
        assert_eq!(loaded.gemini.voice, "Kore");
        assert_eq!(loaded.gemini.timeout_secs, 30);
        assert_eq!(loaded.strokes.stroke_secs, 0.8);
        assert_eq!(loaded.ui.window_position, Some((100.0, 200.0)));
    }

    // ---- credential resolution ---

    #[test]
    fn env_key_wins_over_file_key() {
        assert_eq!(
            resolve_key(Some("env-key".into()), Some("file-key")),
            Some("env-key".into())
        );
    }

    #[test]
    fn file_key_used_when_env_is_unset_or_blank() {
        assert_eq!(resolve_key(None, Some("file-key")), Some("file-key".into()));
        assert_eq!(
            resolve_key(Some("   ".into()), Some("file-key")),
            Some("file-key".into())
        );
    }

    #[test]
    fn no_key_anywhere_resolves_to_none() {
        assert_eq!(resolve_key(None, None), None);
        assert_eq!(resolve_key(Some(String::new()), Some("")), None);
    }
}
