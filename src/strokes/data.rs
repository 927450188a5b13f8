//! Stroke-path data source.
//!
//! Stroke data is fetched per character from the public hanzi-writer dataset
//! (one JSON file per character on a CDN). The wire format uses the
//! hanzi-writer coordinate space — x in `[0, 1024]`, y in `[-124, 900]` with
//! y growing upward — which is normalized at load time to unit coordinates
//! with a top-left origin, ready for direct painting.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::StrokeConfig;

// ---------------------------------------------------------------------------
// StrokeError
// ---------------------------------------------------------------------------

/// Errors that can occur while fetching stroke data.
#[derive(Debug, Error)]
pub enum StrokeError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("stroke data request timed out")]
    Timeout,

    /// The dataset has no entry for this character.
    #[error("no stroke data for this character")]
    Missing,

    /// The response body was not valid stroke data.
    #[error("failed to parse stroke data: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for StrokeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StrokeError::Timeout
        } else {
            StrokeError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// StrokeData
// ---------------------------------------------------------------------------

/// Median polylines for one character, one per stroke, in drawing order,
/// normalized to unit coordinates (top-left origin).
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeData {
    pub medians: Vec<Vec<(f32, f32)>>,
}

impl StrokeData {
    pub fn stroke_count(&self) -> usize {
        self.medians.len()
    }
}

/// Wire shape of a hanzi-writer data file. Only the medians are used; the
/// outline paths and radical indices are ignored.
#[derive(Deserialize)]
struct RawStrokeData {
    medians: Vec<Vec<[f64; 2]>>,
}

/// Parse a hanzi-writer JSON body and normalize its coordinate space.
pub fn parse_stroke_data(body: &str) -> Result<StrokeData, StrokeError> {
    let raw: RawStrokeData =
        serde_json::from_str(body).map_err(|e| StrokeError::Parse(e.to_string()))?;

    if raw.medians.is_empty() {
        return Err(StrokeError::Parse("no strokes in data file".into()));
    }

    let medians = raw
        .medians
        .into_iter()
        .map(|stroke| {
            stroke
                .into_iter()
                .map(|[x, y]| (x as f32 / 1024.0, (900.0 - y as f32) / 1024.0))
                .collect()
        })
        .collect();

    Ok(StrokeData { medians })
}

// ---------------------------------------------------------------------------
// StrokeDataSource trait
// ---------------------------------------------------------------------------

/// Async trait for stroke-data backends.
#[async_trait]
pub trait StrokeDataSource: Send + Sync {
    async fn fetch(&self, character: char) -> Result<StrokeData, StrokeError>;
}

// ---------------------------------------------------------------------------
// CdnStrokeSource
// ---------------------------------------------------------------------------

/// Fetches per-character JSON files from the hanzi-writer data CDN.
pub struct CdnStrokeSource {
    client: reqwest::Client,
    data_url: String,
}

impl CdnStrokeSource {
    /// Build a `CdnStrokeSource` from application config.
    pub fn from_config(config: &StrokeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            data_url: config.data_url.trim_end_matches('/').to_string(),
        }
    }

    fn character_url(&self, character: char) -> String {
        format!("{}/{}.json", self.data_url, character)
    }
}

#[async_trait]
impl StrokeDataSource for CdnStrokeSource {
    async fn fetch(&self, character: char) -> Result<StrokeData, StrokeError> {
        let response = self.client.get(self.character_url(character)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StrokeError::Missing);
        }

        let body = response.text().await?;
        parse_stroke_data(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "strokes": ["M 100 200 L 300 400"],
        "medians": [[[0, 900], [1024, -124]]],
        "radStrokes": []
    }"#;

    #[test]
    fn parses_and_normalizes_coordinates() {
        let data = parse_stroke_data(SAMPLE).expect("parse");
        assert_eq!(data.stroke_count(), 1);

        // (0, 900) is the top-left corner of the glyph box…
        let (x0, y0) = data.medians[0][0];
        assert!((x0 - 0.0).abs() < 1e-6);
        assert!((y0 - 0.0).abs() < 1e-6);

        // …and (1024, -124) the bottom-right.
        let (x1, y1) = data.medians[0][1];
        assert!((x1 - 1.0).abs() < 1e-6);
        assert!((y1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_wire_fields_are_ignored() {
        let body = r#"{"medians": [[[512, 400]]], "somethingNew": true}"#;
        assert!(parse_stroke_data(body).is_ok());
    }

    #[test]
    fn garbage_body_is_a_parse_error() {
        assert!(matches!(
            parse_stroke_data("<html>404</html>"),
            Err(StrokeError::Parse(_))
        ));
    }

    #[test]
    fn empty_median_list_is_a_parse_error() {
        assert!(matches!(
            parse_stroke_data(r#"{"medians": []}"#),
            Err(StrokeError::Parse(_))
        ));
    }

    #[test]
    fn character_url_appends_one_json_file() {
        let source = CdnStrokeSource::from_config(&StrokeConfig::default());
        let url = source.character_url('龟');
        assert!(url.ends_with("/龟.json"));
        assert!(url.starts_with("https://"));
    }
}
