//! The character record — structured etymology/pronunciation/usage data for
//! one Chinese character.
//!
//! [`CharacterRecord`] mirrors the wire schema the analysis endpoint is asked
//! to produce (see [`crate::gemini::schema`]). A record is immutable once
//! received: each new query replaces the previous record wholesale, there is
//! no incremental mutation.
//!
//! Deserialization alone only guarantees that every field is *present*;
//! [`CharacterRecord::validate`] additionally rejects records with empty
//! strings or empty lists, so a record held in the Success state is always
//! fully populated.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// EvolutionStage
// ---------------------------------------------------------------------------

/// One stage of the character's script-form history (甲骨文, 金文, …).
///
/// Stages arrive in chronological order and that order is preserved.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvolutionStage {
    /// Script-form label, e.g. `"甲骨文"`.
    pub stage: String,
    /// What the character looked like / meant at this stage.
    pub description: String,
}

// ---------------------------------------------------------------------------
// EnglishExample
// ---------------------------------------------------------------------------

/// An English example sentence using the character's core concept, with its
/// Chinese translation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnglishExample {
    pub sentence: String,
    pub translation: String,
}

// ---------------------------------------------------------------------------
// CharacterRecord
// ---------------------------------------------------------------------------

/// Full analysis record for a single character.
///
/// Field names follow the wire schema (`snake_case`); `type` is renamed to
/// [`kind`](CharacterRecord::kind) because `type` is a Rust keyword.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CharacterRecord {
    /// The single grapheme under analysis.
    pub character: String,

    /// Romanized readings, ordered by relevance (one or more).
    pub pinyin: Vec<String>,

    /// Modern common meaning, in Chinese.
    pub basic_meaning: String,

    /// Common English translations / definitions.
    pub english_meaning: String,

    /// English example sentences with Chinese translations.
    pub english_examples: Vec<EnglishExample>,

    /// Formation-method classification, e.g. `"象形"`, `"会意"`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Etymology explanation with reasoning.
    pub etymology: String,

    /// Script-form history, chronological.
    pub evolution: Vec<EvolutionStage>,

    /// Structural analysis (radical / component layout).
    pub structure: String,

    /// Writing points — what to pay attention to when writing the character.
    pub stroke_features: String,

    /// Rare / interesting trivia, 2–4 entries.
    pub rare_features: Vec<String>,
}

impl CharacterRecord {
    /// Check the success-state invariant: every string field is non-empty and
    /// every list has at least one fully-populated entry.
    ///
    /// Returns the name of the first offending field so the failure can be
    /// logged; callers surface only a generic error to the user.
    pub fn validate(&self) -> Result<(), String> {
        fn non_empty(name: &'static str, value: &str) -> Result<(), String> {
            if value.trim().is_empty() {
                Err(name.to_string())
            } else {
                Ok(())
            }
        }

        non_empty("character", &self.character)?;
        non_empty("basic_meaning", &self.basic_meaning)?;
        non_empty("english_meaning", &self.english_meaning)?;
        non_empty("type", &self.kind)?;
        non_empty("etymology", &self.etymology)?;
        non_empty("structure", &self.structure)?;
        non_empty("stroke_features", &self.stroke_features)?;

        if self.pinyin.is_empty() {
            return Err("pinyin".into());
        }
        for py in &self.pinyin {
            non_empty("pinyin", py)?;
        }

        if self.english_examples.is_empty() {
            return Err("english_examples".into());
        }
        for ex in &self.english_examples {
            non_empty("english_examples.sentence", &ex.sentence)?;
            non_empty("english_examples.translation", &ex.translation)?;
        }

        if self.evolution.is_empty() {
            return Err("evolution".into());
        }
        for stage in &self.evolution {
            non_empty("evolution.stage", &stage.stage)?;
            non_empty("evolution.description", &stage.description)?;
        }

        if self.rare_features.is_empty() {
            return Err("rare_features".into());
        }
        for fact in &self.rare_features {
            non_empty("rare_features", fact)?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

/// A complete wire payload for 龟, with the full six-stage evolution.
/// Shared by the analysis-client and state-machine tests.
#[cfg(test)]
pub(crate) fn gui_json() -> &'static str {
    r#"{
            "character": "龟",
            "pinyin": ["guī", "jūn", "qiū"],
            "basic_meaning": "爬行动物，背甲坚硬，寿命极长。",
            "english_meaning": "turtle; tortoise",
            "english_examples": [
                {"sentence": "The turtle moves slowly.", "translation": "乌龟移动缓慢。"},
                {"sentence": "A tortoise can live over a hundred years.", "translation": "龟可以活一百多年。"},
                {"sentence": "Slow and steady wins the race, like the tortoise.", "translation": "稳扎稳打方能取胜，正如龟兔赛跑。"}
            ],
            "type": "象形",
            "etymology": "甲骨文像龟的侧视之形，头、甲、足、尾俱全。",
            "evolution": [
                {"stage": "甲骨文", "description": "侧视龟形，突出背甲纹理。"},
                {"stage": "金文", "description": "形体渐趋线条化。"},
                {"stage": "大篆", "description": "背甲纹样规整。"},
                {"stage": "小篆", "description": "笔画圆转匀称。"},
                {"stage": "隶书", "description": "化曲为直，结构方正。"},
                {"stage": "楷书", "description": "今体定形，简化作龟。"}
            ],
            "structure": "独体字",
            "stroke_features": "首笔为撇，中部竖笔贯穿背甲。",
            "rare_features": ["龟甲是最早的汉字书写载体之一。", "古人以龟为长寿灵物，列四灵之一。"]
        }"#
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_complete_record() {
        let record: CharacterRecord = serde_json::from_str(gui_json()).expect("parse");
        assert_eq!(record.character, "龟");
        assert_eq!(record.pinyin[0], "guī");
        assert_eq!(record.evolution.len(), 6);
        assert_eq!(record.kind, "象形");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn wire_field_type_maps_to_kind() {
        let record: CharacterRecord = serde_json::from_str(gui_json()).expect("parse");
        assert_eq!(record.kind, "象形");
    }

    #[test]
    fn evolution_order_is_preserved() {
        let record: CharacterRecord = serde_json::from_str(gui_json()).expect("parse");
        let stages: Vec<&str> = record.evolution.iter().map(|s| s.stage.as_str()).collect();
        assert_eq!(
            stages,
            ["甲骨文", "金文", "大篆", "小篆", "隶书", "楷书"]
        );
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        // Drop `evolution` entirely — deserialization must fail, there is no
        // defaulting of required fields.
        let json = gui_json().replace(r#""evolution""#, r#""_evolution""#);
        assert!(serde_json::from_str::<CharacterRecord>(&json).is_err());
    }

    #[test]
    fn validate_rejects_empty_string_field() {
        let mut record: CharacterRecord = serde_json::from_str(gui_json()).expect("parse");
        record.etymology = "   ".into();
        assert_eq!(record.validate(), Err("etymology".to_string()));
    }

    #[test]
    fn validate_rejects_empty_pinyin_list() {
        let mut record: CharacterRecord = serde_json::from_str(gui_json()).expect("parse");
        record.pinyin.clear();
        assert_eq!(record.validate(), Err("pinyin".to_string()));
    }

    #[test]
    fn validate_rejects_blank_evolution_stage() {
        let mut record: CharacterRecord = serde_json::from_str(gui_json()).expect("parse");
        record.evolution[2].description = String::new();
        assert_eq!(record.validate(), Err("evolution.description".to_string()));
    }

    #[test]
    fn validate_rejects_empty_rare_features() {
        let mut record: CharacterRecord = serde_json::from_str(gui_json()).expect("parse");
        record.rare_features.clear();
        assert_eq!(record.validate(), Err("rare_features".to_string()));
    }
}
