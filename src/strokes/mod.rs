//! Stroke-order provider — CDN-backed stroke data plus the practice widget.
//!
//! The rest of the application treats this module as an opaque collaborator
//! behind two narrow seams: [`StrokeDataSource`] fetches per-character median
//! polylines, and [`StrokeWriter`] exposes {animate, loop, quiz} over them.
//! One writer instance exists per displayed character.

pub mod data;
pub mod writer;

pub use data::{parse_stroke_data, CdnStrokeSource, StrokeData, StrokeDataSource, StrokeError};
pub use writer::{DrawnStrokes, QuizEvent, StrokeWriter, WriterMode};
