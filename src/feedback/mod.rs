//! Transcript-to-feedback pipeline
//!
//! Consumes the finalized transcript of one session, asks the generation
//! capability for a strict five-category analysis, validates its shape, and
//! persists both the standalone feedback record and the denormalized summary
//! on the parent interview.

mod analysis;
mod pipeline;
mod prompt;

pub use analysis::{CategoryScores, FeedbackAnalysis};
pub use pipeline::{FeedbackOutcome, FeedbackPipeline, FeedbackRequest};
pub use prompt::{analysis_prompt, format_transcript, ANALYSIS_SYSTEM};
