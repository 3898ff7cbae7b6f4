//! Interview records, question-set generation, and read-side lookups

mod generator;
mod models;
mod queries;

pub use generator::{create_placeholder_interview, QuestionSetGenerator, QuestionSetRequest};
pub use models::{
    split_tech_stack, FeedbackRecord, FeedbackSummary, InterviewRecord, FEEDBACK_COLLECTION,
    INTERVIEWS_COLLECTION,
};
pub use queries::{
    feedback_for_interview, interview_by_id, interviews_by_user, latest_interviews,
    DEFAULT_LATEST_LIMIT,
};
