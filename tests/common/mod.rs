// Mock collaborators shared by the integration tests.

#![allow(dead_code)]

use anyhow::Result;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use prepcall::providers::{
    CallEvent, Document, DocumentStore, Filter, GenerationError, SortOrder, StartCallRequest,
    TextGenerator, VoiceProvider,
};
use prepcall::InMemoryStore;

/// Voice provider driven by the test: events are pushed through `push`, and
/// `stop_call` closes the stream the way a real provider ends its push
/// channel.
pub struct MockVoice {
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    pub last_request: Mutex<Option<StartCallRequest>>,
    receiver: Mutex<Option<mpsc::Receiver<CallEvent>>>,
    sender: Mutex<Option<mpsc::Sender<CallEvent>>>,
}

impl MockVoice {
    pub fn new() -> Arc<Self> {
        let (tx, rx) = mpsc::channel(64);
        Arc::new(Self {
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            receiver: Mutex::new(Some(rx)),
            sender: Mutex::new(Some(tx)),
        })
    }

    /// Deliver one provider event to the session under test.
    pub async fn push(&self, event: CallEvent) {
        let sender = self.sender.lock().await;
        sender
            .as_ref()
            .expect("call already stopped")
            .send(event)
            .await
            .expect("event channel closed");
    }
}

#[async_trait::async_trait]
impl VoiceProvider for MockVoice {
    async fn start_call(&self, req: StartCallRequest) -> Result<mpsc::Receiver<CallEvent>> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().await = Some(req);
        let rx = self
            .receiver
            .lock()
            .await
            .take()
            .ok_or_else(|| anyhow::anyhow!("call already started"))?;
        Ok(rx)
    }

    async fn stop_call(&self) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        // Dropping the sender closes the event stream.
        self.sender.lock().await.take();
        Ok(())
    }
}

/// Generator stub with scripted responses and call counters.
pub struct MockGenerator {
    pub text_calls: AtomicUsize,
    pub structured_calls: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
    text_response: Option<String>,
    structured_response: Option<Value>,
}

impl MockGenerator {
    /// Every call fails with a provider error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            text_calls: AtomicUsize::new(0),
            structured_calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            text_response: None,
            structured_response: None,
        })
    }

    pub fn with_text(response: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            text_response: Some(response.into()),
            ..Self::unwrapped()
        })
    }

    pub fn with_structured(response: Value) -> Arc<Self> {
        Arc::new(Self {
            structured_response: Some(response),
            ..Self::unwrapped()
        })
    }

    fn unwrapped() -> Self {
        Self {
            text_calls: AtomicUsize::new(0),
            structured_calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            text_response: None,
            structured_response: None,
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().await = Some(prompt.to_string());
        self.text_response
            .clone()
            .ok_or_else(|| GenerationError::Provider("scripted failure".to_string()))
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        _system: &str,
    ) -> Result<Value, GenerationError> {
        self.structured_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().await = Some(prompt.to_string());
        self.structured_response
            .clone()
            .ok_or_else(|| GenerationError::Provider("scripted failure".to_string()))
    }
}

/// Store whose writes always fail, for exercising persistence error paths.
pub struct RejectingStore;

#[async_trait::async_trait]
impl DocumentStore for RejectingStore {
    async fn get_document(&self, _collection: &str, _id: &str) -> Result<Option<Value>> {
        Ok(None)
    }

    async fn set_document(&self, _collection: &str, _id: &str, _doc: Value) -> Result<()> {
        anyhow::bail!("store unavailable")
    }

    async fn update_document(&self, _collection: &str, _id: &str, _patch: Value) -> Result<()> {
        anyhow::bail!("store unavailable")
    }

    async fn query_documents(
        &self,
        _collection: &str,
        _filters: &[Filter],
        _order: Option<SortOrder>,
        _limit: Option<usize>,
    ) -> Result<Vec<Document>> {
        Ok(Vec::new())
    }
}

/// A well-formed analysis object matching the five-category schema.
pub fn analysis_object(total_score: u8) -> Value {
    json!({
        "totalScore": total_score,
        "categoryScores": {
            "Communication Skills": 80,
            "Technical Knowledge": 70,
            "Problem-Solving": 65,
            "Cultural & Role Fit": 75,
            "Confidence & Clarity": 70
        },
        "strengths": ["Clear communication"],
        "areasForImprovement": ["Needs more depth"],
        "finalAssessment": "Solid candidate"
    })
}

/// Seed a minimal interview document the pipeline can merge into.
pub async fn seed_interview(store: &InMemoryStore, id: &str, user_id: &str, tech_stack: &[&str]) {
    store
        .set_document(
            "interviews",
            id,
            json!({
                "id": id,
                "user_id": user_id,
                "role": "Frontend Developer",
                "level": "Junior",
                "tech_stack": tech_stack,
                "interview_type": "Technical",
                "questions": ["Tell me about yourself"],
                "finalized": false,
                "cover_image": "/covers/adobe.png",
                "created_at": "2026-08-01T10:00:00Z"
            }),
        )
        .await
        .unwrap();
}
