use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::session::Speaker;

/// How the assistant is briefed when the call starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallMode {
    /// No fixed questions; the assistant's own script drives the call and
    /// only the candidate identity variables are substituted.
    Generate,
    /// The caller supplies a pre-formatted question list for the assistant
    /// to work through.
    Interview,
}

/// Variables handed to the voice provider when starting a call.
///
/// `questions` is the newline-joined, `- `-prefixed list and is only present
/// in interview mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartCallRequest {
    pub mode: CallMode,
    pub assistant_id: String,
    pub candidate_name: String,
    pub candidate_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<String>,
}

/// One event pushed by the voice provider during a call.
///
/// Events arrive on a single ordered channel; the session consumes them in
/// delivery order.
#[derive(Debug, Clone)]
pub enum CallEvent {
    /// The call connected and is live.
    CallStart,
    /// The provider ended the call on its side.
    CallEnd,
    /// One utterance. `partial` marks an interim hypothesis that will be
    /// superseded; only non-partial utterances are recorded.
    Transcript {
        speaker: Speaker,
        text: String,
        partial: bool,
    },
    /// The assistant started speaking.
    SpeechStart,
    /// The assistant stopped speaking.
    SpeechEnd,
    /// Provider-side error. Non-fatal; the call keeps going.
    Error(String),
}

/// Live call control.
///
/// `start_call` returns the channel receiver the provider will push
/// `CallEvent`s into for the lifetime of the call. The channel closes when
/// the call is over.
#[async_trait::async_trait]
pub trait VoiceProvider: Send + Sync {
    async fn start_call(&self, req: StartCallRequest) -> Result<mpsc::Receiver<CallEvent>>;

    async fn stop_call(&self) -> Result<()>;
}
