//! Query state machine — the single source of truth for one lookup session.
//!
//! [`QueryState`] drives the four-state machine:
//!
//! ```text
//! Idle ──submit──▶ Loading ──completion──▶ Success
//!                          ──failure────▶ Error
//! Success / Error ──submit──▶ Loading   (prior record/message cleared first)
//! any state ──empty submit──▶ unchanged (unconditional no-op)
//! ```
//!
//! Each submission mints a monotonically increasing request token; a
//! completion or failure carrying any other token is stale and is discarded,
//! so rapid re-submissions can race freely without an older response ever
//! overwriting newer state.

use crate::record::CharacterRecord;

/// Fixed user-facing message for any analysis failure. The UI does not
/// distinguish transport errors from malformed responses.
pub const ANALYSIS_FAILED_MESSAGE: &str = "未能解析该字，请稍后再试。";

// ---------------------------------------------------------------------------
// QueryStatus
// ---------------------------------------------------------------------------

/// Status of the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No query yet this session.
    Idle,
    /// An analysis request is in flight.
    Loading,
    /// A validated record is available.
    Success,
    /// The latest analysis failed; a fixed message is shown.
    Error,
}

impl QueryStatus {
    /// Returns `true` while an analysis request is in flight.
    ///
    /// The UI uses this to disable the submit control.
    pub fn is_busy(&self) -> bool {
        matches!(self, QueryStatus::Loading)
    }
}

impl Default for QueryStatus {
    fn default() -> Self {
        QueryStatus::Idle
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// A minted submission: the token fencing this request and the single
/// character derived from the user's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub token: u64,
    pub character: char,
}

// ---------------------------------------------------------------------------
// QueryState
// ---------------------------------------------------------------------------

/// Input text, status, and the mutually exclusive record / error message.
///
/// Invariant: `record` is present iff status is `Success`; `error_message`
/// is present iff status is `Error`; never both.
#[derive(Debug, Default)]
pub struct QueryState {
    /// The text in the input field (user-edited between submits).
    pub input: String,

    /// Current status of the query lifecycle.
    pub status: QueryStatus,

    /// The validated record, present only in `Success`.
    pub record: Option<CharacterRecord>,

    /// The fixed failure message, present only in `Error`.
    pub error_message: Option<String>,

    /// Token of the latest submission; responses with any other token are
    /// stale.
    seq: u64,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit `raw` for analysis.
    ///
    /// Whitespace-only input is an unconditional no-op from every state —
    /// the guard runs before any mutation. Otherwise the prior record or
    /// error is discarded *before* entering `Loading` (no stale content is
    /// ever visible alongside a load), and the query character is the first
    /// `char` of the trimmed input; anything after it is silently dropped.
    pub fn submit(&mut self, raw: &str) -> Option<Submission> {
        let character = raw.trim().chars().next()?;

        self.record = None;
        self.error_message = None;
        self.status = QueryStatus::Loading;
        self.seq += 1;

        Some(Submission {
            token: self.seq,
            character,
        })
    }

    /// Apply a successful analysis response.
    ///
    /// Returns `false` (and changes nothing) when `token` is not the latest
    /// submission.
    pub fn complete(&mut self, token: u64, record: CharacterRecord) -> bool {
        if token != self.seq {
            log::debug!(
                "discarding stale analysis response (token {token}, latest {})",
                self.seq
            );
            return false;
        }
        self.record = Some(record);
        self.error_message = None;
        self.status = QueryStatus::Success;
        true
    }

    /// Apply a failed analysis response.
    ///
    /// Returns `false` (and changes nothing) when `token` is not the latest
    /// submission. Stores the fixed localized message; the internal failure
    /// variant was already logged at the call site.
    pub fn fail(&mut self, token: u64) -> bool {
        if token != self.seq {
            log::debug!(
                "discarding stale analysis failure (token {token}, latest {})",
                self.seq
            );
            return false;
        }
        self.record = None;
        self.error_message = Some(ANALYSIS_FAILED_MESSAGE.to_string());
        self.status = QueryStatus::Error;
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn gui_record() -> CharacterRecord {
        serde_json::from_str(crate::record::gui_json()).expect("fixture")
    }

    // ---- submit guard ---

    #[test]
    fn empty_submit_is_a_no_op_from_idle() {
        let mut state = QueryState::new();
        assert!(state.submit("").is_none());
        assert!(state.submit("   \t\n").is_none());
        assert_eq!(state.status, QueryStatus::Idle);
        assert!(state.record.is_none());
        assert!(state.error_message.is_none());
    }

    #[test]
    fn empty_submit_is_a_no_op_from_success() {
        let mut state = QueryState::new();
        let sub = state.submit("龟").unwrap();
        state.complete(sub.token, gui_record());

        assert!(state.submit("   ").is_none());
        assert_eq!(state.status, QueryStatus::Success);
        assert!(state.record.is_some());
    }

    #[test]
    fn empty_submit_is_a_no_op_from_error() {
        let mut state = QueryState::new();
        let sub = state.submit("龟").unwrap();
        state.fail(sub.token);

        assert!(state.submit("").is_none());
        assert_eq!(state.status, QueryStatus::Error);
        assert_eq!(state.error_message.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
    }

    // ---- character derivation ---

    #[test]
    fn query_character_is_first_char_after_trim() {
        let mut state = QueryState::new();
        let sub = state.submit("道 ").unwrap();
        assert_eq!(sub.character, '道');
    }

    #[test]
    fn trailing_characters_are_silently_dropped() {
        let mut state = QueryState::new();
        let sub = state.submit("  龙凤呈祥").unwrap();
        assert_eq!(sub.character, '龙');
    }

    // ---- transitions ---

    #[test]
    fn submit_enters_loading_with_nothing_visible() {
        let mut state = QueryState::new();
        state.submit("龟").unwrap();
        assert_eq!(state.status, QueryStatus::Loading);
        assert!(state.status.is_busy());
        assert!(state.record.is_none());
        assert!(state.error_message.is_none());
    }

    #[test]
    fn completion_stores_the_exact_record() {
        let mut state = QueryState::new();
        let sub = state.submit("龟").unwrap();
        state.complete(sub.token, gui_record());

        assert_eq!(state.status, QueryStatus::Success);
        let record = state.record.as_ref().expect("record");
        assert_eq!(record.character, "龟");
        assert_eq!(record.pinyin[0], "guī");
        assert_eq!(record.evolution.len(), 6);
        assert!(state.error_message.is_none());
    }

    #[test]
    fn failure_stores_fixed_message_and_no_record() {
        let mut state = QueryState::new();
        let sub = state.submit("龟").unwrap();
        state.fail(sub.token);

        assert_eq!(state.status, QueryStatus::Error);
        assert!(state.record.is_none());
        assert_eq!(state.error_message.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
    }

    #[test]
    fn resubmit_clears_prior_record_before_loading() {
        let mut state = QueryState::new();
        let sub = state.submit("龟").unwrap();
        state.complete(sub.token, gui_record());

        state.submit("道").unwrap();
        assert_eq!(state.status, QueryStatus::Loading);
        assert!(state.record.is_none(), "stale record must not survive into Loading");
    }

    #[test]
    fn resubmit_clears_prior_error_before_loading() {
        let mut state = QueryState::new();
        let sub = state.submit("龟").unwrap();
        state.fail(sub.token);

        state.submit("道").unwrap();
        assert_eq!(state.status, QueryStatus::Loading);
        assert!(state.error_message.is_none());
    }

    // ---- stale-response fencing ---

    #[test]
    fn stale_completion_is_discarded() {
        let mut state = QueryState::new();
        let first = state.submit("龟").unwrap();
        let second = state.submit("道").unwrap();
        assert!(second.token > first.token);

        // The older request resolves after the newer one was issued.
        assert!(!state.complete(first.token, gui_record()));
        assert_eq!(state.status, QueryStatus::Loading, "stale response must not win");
        assert!(state.record.is_none());

        assert!(state.fail(second.token));
        assert_eq!(state.status, QueryStatus::Error);
    }

    #[test]
    fn stale_failure_is_discarded() {
        let mut state = QueryState::new();
        let first = state.submit("龟").unwrap();
        let second = state.submit("道").unwrap();

        assert!(!state.fail(first.token));
        assert_eq!(state.status, QueryStatus::Loading);
        assert!(state.error_message.is_none());

        assert!(state.complete(second.token, gui_record()));
        assert_eq!(state.status, QueryStatus::Success);
    }

    #[test]
    fn latest_response_wins_regardless_of_arrival_order() {
        let mut state = QueryState::new();
        let first = state.submit("龟").unwrap();
        let second = state.submit("道").unwrap();

        state.complete(second.token, gui_record());
        assert_eq!(state.status, QueryStatus::Success);

        // The older response arriving last must not overwrite the newer one.
        state.fail(first.token);
        assert_eq!(state.status, QueryStatus::Success);
        assert!(state.record.is_some());
    }
}
