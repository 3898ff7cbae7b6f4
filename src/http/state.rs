use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::feedback::FeedbackPipeline;
use crate::interview::QuestionSetGenerator;
use crate::providers::{DocumentStore, TextGenerator, VoiceProvider};
use crate::session::CallSession;

/// Defaults applied to every new session.
#[derive(Clone)]
pub struct SessionDefaults {
    pub assistant_id: String,
    pub grace_delay: Duration,
}

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Live call sessions (session_id -> session).
    pub sessions: Arc<RwLock<HashMap<String, Arc<CallSession>>>>,

    pub voice: Arc<dyn VoiceProvider>,
    pub store: Arc<dyn DocumentStore>,
    pub feedback: Arc<FeedbackPipeline>,
    pub question_sets: Arc<QuestionSetGenerator>,

    pub defaults: SessionDefaults,
}

impl AppState {
    pub fn new(
        voice: Arc<dyn VoiceProvider>,
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn DocumentStore>,
        defaults: SessionDefaults,
    ) -> Self {
        let feedback = Arc::new(FeedbackPipeline::new(
            Arc::clone(&generator),
            Arc::clone(&store),
        ));
        let question_sets = Arc::new(QuestionSetGenerator::new(generator, Arc::clone(&store)));

        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            voice,
            store,
            feedback,
            question_sets,
            defaults,
        }
    }
}
