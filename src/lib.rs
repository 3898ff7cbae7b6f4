pub mod config;
pub mod feedback;
pub mod http;
pub mod interview;
pub mod providers;
pub mod session;

pub use config::Config;
pub use feedback::{
    CategoryScores, FeedbackAnalysis, FeedbackOutcome, FeedbackPipeline, FeedbackRequest,
};
pub use http::{create_router, AppState, SessionDefaults};
pub use interview::{
    FeedbackRecord, FeedbackSummary, InterviewRecord, QuestionSetGenerator, QuestionSetRequest,
};
pub use providers::{
    CallEvent, CallMode, DocumentStore, GenerationError, InMemoryStore, StartCallRequest,
    TextGenerator, VoiceProvider,
};
pub use session::{CallSession, EndOutcome, SessionConfig, SessionState, Speaker, TurnRecord};
