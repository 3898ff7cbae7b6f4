use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Party a finalized utterance is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Candidate,
    Interviewer,
    System,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Candidate => "candidate",
            Speaker::Interviewer => "interviewer",
            Speaker::System => "system",
        }
    }
}

/// One finalized utterance. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub speaker: Speaker,
    pub content: String,
}

impl TurnRecord {
    pub fn new(speaker: Speaker, content: impl Into<String>) -> Self {
        Self {
            speaker,
            content: content.into(),
        }
    }
}

/// Ordered, append-only, in-memory store of turns for one session.
///
/// Unbounded; append never fails. `drain` is a one-time read taken at session
/// end for the hand-off to the feedback pipeline.
#[derive(Clone, Default)]
pub struct TranscriptBuffer {
    turns: Arc<Mutex<Vec<TurnRecord>>>,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, turn: TurnRecord) {
        let mut turns = self.turns.lock().await;
        turns.push(turn);
    }

    pub async fn len(&self) -> usize {
        self.turns.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.turns.lock().await.is_empty()
    }

    /// Take the full ordered sequence, leaving the buffer empty.
    pub async fn drain(&self) -> Vec<TurnRecord> {
        let mut turns = self.turns.lock().await;
        std::mem::take(&mut *turns)
    }

    /// Snapshot without consuming (status/UI reads).
    pub async fn snapshot(&self) -> Vec<TurnRecord> {
        self.turns.lock().await.clone()
    }
}
