//! Strict response schema for character analysis.
//!
//! Sent as `generationConfig.responseSchema` alongside
//! `responseMimeType: application/json`, which constrains the model to emit
//! machine-parseable JSON matching [`crate::record::CharacterRecord`]. Every
//! field is required; a reply missing any of them fails deserialization and
//! is treated as an analysis failure.

use serde_json::{json, Value};

/// The response schema for one [`CharacterRecord`](crate::record::CharacterRecord).
///
/// Type names use the uppercase spelling the generative-language REST API
/// expects (`OBJECT`, `ARRAY`, `STRING`).
pub fn character_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "character": { "type": "STRING" },
            "pinyin": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "basic_meaning": { "type": "STRING" },
            "english_meaning": {
                "type": "STRING",
                "description": "Common English translations/definitions"
            },
            "english_examples": {
                "type": "ARRAY",
                "description": "3 English sentences using the character's concept with translations",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "sentence": { "type": "STRING" },
                        "translation": { "type": "STRING" }
                    },
                    "required": ["sentence", "translation"]
                }
            },
            "type": { "type": "STRING" },
            "etymology": { "type": "STRING" },
            "evolution": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "stage": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    },
                    "required": ["stage", "description"]
                }
            },
            "structure": { "type": "STRING" },
            "stroke_features": { "type": "STRING" },
            "rare_features": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": [
            "character", "pinyin", "basic_meaning", "english_meaning",
            "english_examples", "type", "etymology", "evolution",
            "structure", "stroke_features", "rare_features"
        ]
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
