use std::time::Duration;

use crate::providers::CallMode;

/// Configuration for one call session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "session-<uuid>").
    pub session_id: String,

    /// Whether this call generates a question set or runs a scored interview.
    pub mode: CallMode,

    /// Provider-side assistant to start the call with.
    pub assistant_id: String,

    /// Candidate display name, substituted into the assistant script.
    pub candidate_name: String,

    /// Candidate identifier.
    pub user_id: String,

    /// Interview the session belongs to. Without it no feedback cycle runs.
    pub interview_id: Option<String>,

    /// Existing feedback record to overwrite on re-score.
    pub feedback_id: Option<String>,

    /// Questions for interview mode, one per entry.
    pub questions: Vec<String>,

    /// Delay between an end request and the provider stop, so in-flight
    /// final transcripts still land in the buffer.
    pub grace_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            mode: CallMode::Interview,
            assistant_id: String::new(),
            candidate_name: String::new(),
            user_id: String::new(),
            interview_id: None,
            feedback_id: None,
            questions: Vec::new(),
            grace_delay: Duration::from_millis(1500),
        }
    }
}
