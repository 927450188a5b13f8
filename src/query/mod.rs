//! Query lifecycle — the state machine and its session orchestrator.
//!
//! [`QueryState`] owns the input text, the four-state status and the
//! mutually exclusive record/error pair; [`run_session`] executes the
//! network side on the tokio runtime, exchanging [`QueryCommand`] /
//! [`QueryResult`] messages with the UI thread.

pub mod runner;
pub mod state;

pub use runner::{run_session, QueryCommand, QueryResult};
pub use state::{QueryState, QueryStatus, Submission, ANALYSIS_FAILED_MESSAGE};
