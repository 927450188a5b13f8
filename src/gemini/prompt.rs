//! Prompt construction for character analysis.
//!
//! A single instruction template, in Chinese, asking the model to act as a
//! professional palaeographer and produce the full analysis the UI renders:
//! readings, meanings, English examples, formation method, etymology, the
//! six-stage script evolution, structure, writing points and rare facts.
//! The structured shape of the reply is enforced separately by the response
//! schema (see [`crate::gemini::schema`]); the prompt carries the content
//! requirements and the register.

// ---------------------------------------------------------------------------
// Instruction template
// ---------------------------------------------------------------------------

const ANALYSIS_INSTRUCTION: &str = "\
请扮演一位专业的古文字学家和语言学家。我们需要该汉字的中文深度分析以及英文对应释义。

需包含以下信息：
1. 现代汉语常见含义及所有常见读音。
2. 英文释义（English Meaning）：该字对应的常见英文单词或短语。
3. 英文例句（English Examples）：提供3个使用该汉字核心概念的英文例句，并附带中文翻译。
4. 造字法。
5. 字源解释（给出理由）。
6. 演变过程（甲骨文 → 金文 → 大篆 → 小篆 → 隶书 → 楷书）。
7. 结构分析。
8. 书写要点。
9. 2-4条有趣且少见的冷知识。

若汉字无确切甲骨文或金文形态，按文字学常识说明。
语气要求：专业、古雅、准确。";

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the full analysis prompt for one character.
///
/// # Example
/// ```rust
/// use hanzi_etymology::gemini::prompt::analysis_prompt;
///
/// let prompt = analysis_prompt('龟');
/// assert!(prompt.contains('龟'));
/// assert!(prompt.contains("古文字学家"));
/// ```
pub fn analysis_prompt(character: char) -> String {
    format!("请分析汉字：“{character}”。\n\n{ANALYSIS_INSTRUCTION}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_character() {
        let prompt = analysis_prompt('道');
        assert!(prompt.contains("请分析汉字：“道”"));
    }

    #[test]
    fn prompt_requests_every_section() {
        let prompt = analysis_prompt('龙');
        for cue in [
            "读音",
            "English Meaning",
            "English Examples",
            "造字法",
            "字源解释",
            "甲骨文",
            "楷书",
            "结构分析",
            "书写要点",
            "冷知识",
        ] {
            assert!(prompt.contains(cue), "prompt must mention {cue}");
        }
    }

    #[test]
    fn prompt_sets_register() {
        let prompt = analysis_prompt('墨');
        assert!(prompt.contains("专业、古雅、准确"));
    }
}
