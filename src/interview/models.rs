use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feedback::CategoryScores;

/// Collection names in the document store.
pub const INTERVIEWS_COLLECTION: &str = "interviews";
pub const FEEDBACK_COLLECTION: &str = "feedback";

/// A persisted interview.
///
/// Created fully populated (`finalized=true`) by the question-set generator,
/// or as an empty placeholder (`finalized=false`) at the start of a
/// generate-mode call, to be completed by a later feedback cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub id: String,
    pub user_id: String,
    pub role: String,
    pub level: String,
    pub tech_stack: Vec<String>,
    pub interview_type: String,
    pub questions: Vec<String>,
    pub finalized: bool,
    pub cover_image: String,
    pub created_at: DateTime<Utc>,
    /// Denormalized copy of the latest feedback, embedded once a feedback
    /// cycle has completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackSummary>,
}

/// A persisted standalone feedback report for one interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub interview_id: String,
    pub user_id: String,
    pub total_score: u8,
    pub category_scores: CategoryScores,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
    pub created_at: DateTime<Utc>,
}

/// The denormalized summary embedded on the interview record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub total_score: u8,
    pub category_scores: CategoryScores,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
    pub created_at: DateTime<Utc>,
}

/// Comma-separated free text into a trimmed list: `"React, Node"` becomes
/// `["React", "Node"]`. Empty segments are dropped.
pub fn split_tech_stack(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
