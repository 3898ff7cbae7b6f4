use anyhow::Result;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::config::SessionConfig;
use super::transcript::{TranscriptBuffer, TurnRecord};
use crate::feedback::{FeedbackOutcome, FeedbackPipeline, FeedbackRequest};
use crate::interview::create_placeholder_interview;
use crate::providers::{CallEvent, CallMode, DocumentStore, StartCallRequest, VoiceProvider};

/// Lifecycle of one live call.
///
/// `Finished` is terminal; the session object is discarded and a new one is
/// created for a new call. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Connecting,
    Active,
    Finished,
}

impl SessionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => SessionState::Connecting,
            2 => SessionState::Active,
            3 => SessionState::Finished,
            _ => SessionState::Idle,
        }
    }
}

/// What happened when a session ended.
///
/// The first three variants are guarded no-ops, not errors: ending without a
/// feedback cycle is normal for question-set calls, sessions with no
/// interview to attach to, and calls where nothing was said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOutcome {
    /// The session was not in an endable state (never begun, already
    /// finished, or a second end request while one is in flight).
    AlreadyEnded,
    /// Question-set calls do not produce scored feedback.
    QuestionSession,
    /// No interview identifier to attach feedback to.
    MissingInterview,
    /// Empty transcript; nothing to score.
    EmptyTranscript,
    /// A feedback cycle ran.
    Feedback(FeedbackOutcome),
}

/// One voice call: owns the lifecycle, feeds provider events into the
/// transcript buffer, and hands the finished transcript to the feedback
/// pipeline exactly once.
///
/// Exactly two transitions are externally triggerable: `begin` and `end`.
/// Everything else is driven by the provider's event stream, consumed in
/// arrival order by a single task.
pub struct CallSession {
    config: SessionConfig,

    voice: Arc<dyn VoiceProvider>,
    store: Arc<dyn DocumentStore>,
    feedback: Arc<FeedbackPipeline>,

    state: Arc<AtomicU8>,
    is_speaking: Arc<AtomicBool>,
    transcript: TranscriptBuffer,

    /// Interview created by the session-start placeholder operation in
    /// generate mode; interview-mode sessions carry theirs in the config.
    placeholder_interview: Mutex<Option<String>>,

    /// Claimed by the first `end` request; later requests are no-ops.
    ending: AtomicBool,

    /// Serializes begin/end so the two transitions never interleave.
    lifecycle: Mutex<()>,

    event_task: Mutex<Option<JoinHandle<()>>>,
}

impl CallSession {
    pub fn new(
        config: SessionConfig,
        voice: Arc<dyn VoiceProvider>,
        store: Arc<dyn DocumentStore>,
        feedback: Arc<FeedbackPipeline>,
    ) -> Self {
        Self {
            config,
            voice,
            store,
            feedback,
            state: Arc::new(AtomicU8::new(SessionState::Idle as u8)),
            is_speaking: Arc::new(AtomicBool::new(false)),
            transcript: TranscriptBuffer::new(),
            placeholder_interview: Mutex::new(None),
            ending: AtomicBool::new(false),
            lifecycle: Mutex::new(()),
            event_task: Mutex::new(None),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn interview_id(&self) -> Option<&str> {
        self.config.interview_id.as_deref()
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_speaking(&self) -> bool {
        self.is_speaking.load(Ordering::SeqCst)
    }

    pub async fn transcript_len(&self) -> usize {
        self.transcript.len().await
    }

    /// Current turns, without consuming them (status reads).
    pub async fn transcript_snapshot(&self) -> Vec<TurnRecord> {
        self.transcript.snapshot().await
    }

    /// Start the call.
    ///
    /// Valid from `Idle` or `Finished` only; anywhere else this is a guarded
    /// no-op. Transitions to `Connecting`, creates the placeholder interview
    /// record when the call is in generate mode, starts the provider call,
    /// and spawns the event-consumer task. The provider signals `call-start`
    /// asynchronously to reach `Active`.
    pub async fn begin(&self) -> Result<()> {
        let _lifecycle = self.lifecycle.lock().await;

        match self.state() {
            SessionState::Idle | SessionState::Finished => {}
            current => {
                warn!(
                    "begin ignored for session {}: state is {:?}",
                    self.config.session_id, current
                );
                return Ok(());
            }
        }

        info!(
            "Starting call session {} ({:?} mode)",
            self.config.session_id, self.config.mode
        );
        // Restarting from Finished clears the previous end claim.
        self.ending.store(false, Ordering::SeqCst);
        self.is_speaking.store(false, Ordering::SeqCst);
        self.state
            .store(SessionState::Connecting as u8, Ordering::SeqCst);

        // Generate-mode calls get one empty interview record up front; the
        // assistant fills it in through the question-set endpoint.
        if self.config.mode == CallMode::Generate {
            let mut placeholder = self.placeholder_interview.lock().await;
            if placeholder.is_none() {
                let id = match create_placeholder_interview(self.store.as_ref(), &self.config.user_id)
                    .await
                {
                    Ok(id) => id,
                    Err(e) => {
                        self.state.store(SessionState::Idle as u8, Ordering::SeqCst);
                        return Err(e.context("Failed to create placeholder interview"));
                    }
                };
                info!("Created placeholder interview {}", id);
                *placeholder = Some(id);
            }
        }

        let request = StartCallRequest {
            mode: self.config.mode,
            assistant_id: self.config.assistant_id.clone(),
            candidate_name: self.config.candidate_name.clone(),
            candidate_id: self.config.user_id.clone(),
            questions: match self.config.mode {
                CallMode::Generate => None,
                CallMode::Interview => Some(format_questions(&self.config.questions)),
            },
        };

        let mut events = match self.voice.start_call(request).await {
            Ok(rx) => rx,
            Err(e) => {
                self.state.store(SessionState::Idle as u8, Ordering::SeqCst);
                return Err(e.context("Failed to start provider call"));
            }
        };

        let state = Arc::clone(&self.state);
        let is_speaking = Arc::clone(&self.is_speaking);
        let transcript = self.transcript.clone();
        let session_id = self.config.session_id.clone();

        let task = tokio::spawn(async move {
            info!("Event task started for session {}", session_id);

            while let Some(event) = events.recv().await {
                match event {
                    CallEvent::CallStart => {
                        info!("Call connected for session {}", session_id);
                        state.store(SessionState::Active as u8, Ordering::SeqCst);
                    }
                    CallEvent::CallEnd => {
                        info!("Provider ended call for session {}", session_id);
                        state.store(SessionState::Finished as u8, Ordering::SeqCst);
                    }
                    CallEvent::Transcript {
                        speaker,
                        text,
                        partial,
                    } => {
                        // Interim hypotheses are superseded later; only
                        // finalized utterances become turns.
                        if !partial {
                            transcript.append(TurnRecord::new(speaker, text)).await;
                        }
                    }
                    CallEvent::SpeechStart => {
                        is_speaking.store(true, Ordering::SeqCst);
                    }
                    CallEvent::SpeechEnd => {
                        is_speaking.store(false, Ordering::SeqCst);
                    }
                    CallEvent::Error(message) => {
                        // Provider errors are observational; the call keeps
                        // its state.
                        warn!("Provider error in session {}: {}", session_id, message);
                    }
                }
            }

            info!("Event task stopped for session {}", session_id);
        });

        {
            let mut handle = self.event_task.lock().await;
            *handle = Some(task);
        }

        Ok(())
    }

    /// End the call and run the post-call hand-off.
    ///
    /// Valid from `Active` or `Connecting`. Waits out the grace delay so
    /// in-flight final transcripts land, stops the provider call, and then
    /// decides the hand-off once: generate-mode sessions, sessions without an
    /// interview id, and empty transcripts end without a feedback cycle.
    pub async fn end(&self) -> Result<EndOutcome> {
        if self.ending.swap(true, Ordering::SeqCst) {
            warn!(
                "end ignored for session {}: already ending",
                self.config.session_id
            );
            return Ok(EndOutcome::AlreadyEnded);
        }

        let _lifecycle = self.lifecycle.lock().await;

        match self.state() {
            SessionState::Active | SessionState::Connecting => {}
            current => {
                warn!(
                    "end ignored for session {}: state is {:?}",
                    self.config.session_id, current
                );
                self.ending.store(false, Ordering::SeqCst);
                return Ok(EndOutcome::AlreadyEnded);
            }
        }

        info!("Ending call session {}", self.config.session_id);

        // Let in-flight final-transcript events arrive before the buffer is
        // considered closed.
        tokio::time::sleep(self.config.grace_delay).await;

        if let Err(e) = self.voice.stop_call().await {
            // Provider errors are non-fatal; the session still finishes.
            error!(
                "Failed to stop provider call for session {}: {}",
                self.config.session_id, e
            );
        }

        self.state
            .store(SessionState::Finished as u8, Ordering::SeqCst);

        // The provider closes the event channel once the call stops; wait for
        // the consumer task so every delivered event is processed before the
        // buffer is drained.
        {
            let mut handle = self.event_task.lock().await;
            if let Some(task) = handle.take() {
                if let Err(e) = task.await {
                    error!("Event task panicked: {}", e);
                }
            }
        }

        if self.config.mode == CallMode::Generate {
            info!(
                "Session {} was a question-set call; no feedback cycle",
                self.config.session_id
            );
            return Ok(EndOutcome::QuestionSession);
        }

        let Some(interview_id) = self.config.interview_id.clone() else {
            warn!(
                "Session {} has no interview id; skipping feedback",
                self.config.session_id
            );
            return Ok(EndOutcome::MissingInterview);
        };

        if self.transcript.is_empty().await {
            info!(
                "Session {} produced no transcript; skipping feedback",
                self.config.session_id
            );
            return Ok(EndOutcome::EmptyTranscript);
        }

        let transcript = self.transcript.drain().await;
        info!(
            "Handing {} turns to the feedback pipeline for interview {}",
            transcript.len(),
            interview_id
        );

        let outcome = self
            .feedback
            .generate(FeedbackRequest {
                interview_id,
                user_id: self.config.user_id.clone(),
                transcript,
                feedback_id: self.config.feedback_id.clone(),
                role: None,
                tech_stack: None,
                interview_type: None,
            })
            .await;

        Ok(EndOutcome::Feedback(outcome))
    }
}

/// Newline-joined, bullet-prefixed question list, the shape the assistant
/// script substitutes verbatim.
fn format_questions(questions: &[String]) -> String {
    questions
        .iter()
        .map(|q| format!("- {}", q))
        .collect::<Vec<_>>()
        .join("\n")
}
