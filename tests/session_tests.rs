// Call session state machine: event ordering, guards, and the end-of-call
// hand-off.

mod common;

use common::{analysis_object, seed_interview, MockGenerator, MockVoice};
use prepcall::feedback::{FeedbackOutcome, FeedbackPipeline};
use prepcall::providers::{CallEvent, CallMode, DocumentStore};
use prepcall::session::{CallSession, EndOutcome, SessionConfig, SessionState, Speaker};
use prepcall::InMemoryStore;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn test_config(mode: CallMode, interview_id: Option<&str>) -> SessionConfig {
    SessionConfig {
        mode,
        assistant_id: "interviewer".to_string(),
        candidate_name: "Ada".to_string(),
        user_id: "user-1".to_string(),
        interview_id: interview_id.map(String::from),
        grace_delay: Duration::from_millis(30),
        ..SessionConfig::default()
    }
}

struct Harness {
    session: CallSession,
    voice: Arc<MockVoice>,
    generator: Arc<MockGenerator>,
    store: Arc<InMemoryStore>,
}

fn harness(config: SessionConfig, generator: Arc<MockGenerator>) -> Harness {
    let voice = MockVoice::new();
    let store = Arc::new(InMemoryStore::new());
    let feedback = Arc::new(FeedbackPipeline::new(
        generator.clone() as Arc<dyn prepcall::TextGenerator>,
        store.clone() as Arc<dyn DocumentStore>,
    ));
    let session = CallSession::new(
        config,
        voice.clone() as Arc<dyn prepcall::VoiceProvider>,
        store.clone() as Arc<dyn DocumentStore>,
        feedback,
    );
    Harness {
        session,
        voice,
        generator,
        store,
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn records_final_transcripts_in_arrival_order() {
    let h = harness(
        test_config(CallMode::Interview, Some("int-1")),
        MockGenerator::failing(),
    );

    h.session.begin().await.unwrap();
    assert_eq!(h.session.state(), SessionState::Connecting);

    h.voice.push(CallEvent::CallStart).await;
    h.voice
        .push(CallEvent::Transcript {
            speaker: Speaker::Interviewer,
            text: "Tell me about yourself".to_string(),
            partial: false,
        })
        .await;
    h.voice
        .push(CallEvent::Transcript {
            speaker: Speaker::Candidate,
            text: "I ha".to_string(),
            partial: true,
        })
        .await;
    h.voice.push(CallEvent::SpeechStart).await;
    h.voice
        .push(CallEvent::Transcript {
            speaker: Speaker::Candidate,
            text: "I have 3 years of React experience".to_string(),
            partial: false,
        })
        .await;
    h.voice.push(CallEvent::SpeechEnd).await;
    settle().await;

    assert_eq!(h.session.state(), SessionState::Active);
    assert!(!h.session.is_speaking());

    let turns = h.session.transcript_snapshot().await;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].speaker, Speaker::Interviewer);
    assert_eq!(turns[0].content, "Tell me about yourself");
    assert_eq!(turns[1].speaker, Speaker::Candidate);
    assert_eq!(turns[1].content, "I have 3 years of React experience");
}

#[tokio::test]
async fn speech_events_toggle_the_speaking_flag_without_transitions() {
    let h = harness(
        test_config(CallMode::Interview, Some("int-1")),
        MockGenerator::failing(),
    );

    h.session.begin().await.unwrap();
    h.voice.push(CallEvent::CallStart).await;
    h.voice.push(CallEvent::SpeechStart).await;
    settle().await;

    assert!(h.session.is_speaking());
    assert_eq!(h.session.state(), SessionState::Active);

    h.voice.push(CallEvent::SpeechEnd).await;
    settle().await;
    assert!(!h.session.is_speaking());
    assert_eq!(h.session.state(), SessionState::Active);
}

#[tokio::test]
async fn provider_errors_are_nonfatal() {
    let h = harness(
        test_config(CallMode::Interview, Some("int-1")),
        MockGenerator::failing(),
    );

    h.session.begin().await.unwrap();
    h.voice.push(CallEvent::CallStart).await;
    h.voice
        .push(CallEvent::Error("ice disconnected".to_string()))
        .await;
    settle().await;

    assert_eq!(h.session.state(), SessionState::Active);
}

#[tokio::test]
async fn begin_is_a_noop_while_connecting_or_active() {
    let h = harness(
        test_config(CallMode::Interview, Some("int-1")),
        MockGenerator::failing(),
    );

    h.session.begin().await.unwrap();
    h.session.begin().await.unwrap();
    assert_eq!(h.voice.start_calls.load(Ordering::SeqCst), 1);

    h.voice.push(CallEvent::CallStart).await;
    settle().await;
    h.session.begin().await.unwrap();
    assert_eq!(h.voice.start_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn end_before_begin_is_a_guarded_noop() {
    let h = harness(
        test_config(CallMode::Interview, Some("int-1")),
        MockGenerator::failing(),
    );

    let outcome = h.session.end().await.unwrap();
    assert_eq!(outcome, EndOutcome::AlreadyEnded);
    assert_eq!(h.voice.stop_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn interview_mode_hands_transcript_to_feedback_once() {
    let generator = MockGenerator::with_structured(analysis_object(72));
    let h = harness(test_config(CallMode::Interview, Some("int-1")), generator);
    seed_interview(&h.store, "int-1", "user-1", &["React"]).await;

    h.session.begin().await.unwrap();
    h.voice.push(CallEvent::CallStart).await;
    h.voice
        .push(CallEvent::Transcript {
            speaker: Speaker::Candidate,
            text: "I have 3 years of React experience".to_string(),
            partial: false,
        })
        .await;
    settle().await;

    let outcome = h.session.end().await.unwrap();
    match outcome {
        EndOutcome::Feedback(FeedbackOutcome::Saved { feedback_id }) => {
            let record = h
                .store
                .get_document("feedback", &feedback_id)
                .await
                .unwrap()
                .expect("feedback record persisted");
            assert_eq!(record["total_score"], 72);
        }
        other => panic!("expected a saved feedback cycle, got {:?}", other),
    }
    assert_eq!(h.generator.structured_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.session.state(), SessionState::Finished);
}

#[tokio::test]
async fn double_end_runs_a_single_feedback_cycle() {
    let generator = MockGenerator::with_structured(analysis_object(72));
    let h = harness(test_config(CallMode::Interview, Some("int-1")), generator);
    seed_interview(&h.store, "int-1", "user-1", &[]).await;

    h.session.begin().await.unwrap();
    h.voice.push(CallEvent::CallStart).await;
    h.voice
        .push(CallEvent::Transcript {
            speaker: Speaker::Candidate,
            text: "Hello".to_string(),
            partial: false,
        })
        .await;
    settle().await;

    // Second request lands inside the first one's grace window.
    let (first, second) = tokio::join!(h.session.end(), h.session.end());
    let outcomes = [first.unwrap(), second.unwrap()];

    assert!(outcomes.contains(&EndOutcome::AlreadyEnded));
    assert!(outcomes
        .iter()
        .any(|o| matches!(o, EndOutcome::Feedback(FeedbackOutcome::Saved { .. }))));
    assert_eq!(h.generator.structured_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.store.len("feedback").await, 1);
}

#[tokio::test]
async fn generate_mode_skips_feedback_and_creates_placeholder() {
    let h = harness(test_config(CallMode::Generate, None), MockGenerator::failing());

    h.session.begin().await.unwrap();
    assert_eq!(h.store.len("interviews").await, 1);

    h.voice.push(CallEvent::CallStart).await;
    h.voice
        .push(CallEvent::Transcript {
            speaker: Speaker::Candidate,
            text: "I would like a frontend interview".to_string(),
            partial: false,
        })
        .await;
    settle().await;

    let outcome = h.session.end().await.unwrap();
    assert_eq!(outcome, EndOutcome::QuestionSession);
    assert_eq!(h.generator.structured_calls.load(Ordering::SeqCst), 0);

    // Placeholder stays unfinalized until a feedback cycle completes it.
    let docs = h
        .store
        .query_documents("interviews", &[], None, None)
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].data["finalized"], false);
}

#[tokio::test]
async fn failed_placeholder_write_leaves_the_session_retryable() {
    let voice = MockVoice::new();
    let store = Arc::new(common::RejectingStore);
    let feedback = Arc::new(FeedbackPipeline::new(
        MockGenerator::failing() as Arc<dyn prepcall::TextGenerator>,
        store.clone() as Arc<dyn DocumentStore>,
    ));
    let session = CallSession::new(
        test_config(CallMode::Generate, None),
        voice.clone() as Arc<dyn prepcall::VoiceProvider>,
        store as Arc<dyn DocumentStore>,
        feedback,
    );

    assert!(session.begin().await.is_err());

    // The call was never started and the session is back where it began.
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(voice.start_calls.load(Ordering::SeqCst), 0);

    // A later begin is a fresh attempt, not a guarded no-op.
    assert!(session.begin().await.is_err());
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn missing_interview_id_skips_feedback() {
    let h = harness(test_config(CallMode::Interview, None), MockGenerator::failing());

    h.session.begin().await.unwrap();
    h.voice.push(CallEvent::CallStart).await;
    h.voice
        .push(CallEvent::Transcript {
            speaker: Speaker::Candidate,
            text: "Hello".to_string(),
            partial: false,
        })
        .await;
    settle().await;

    let outcome = h.session.end().await.unwrap();
    assert_eq!(outcome, EndOutcome::MissingInterview);
    assert_eq!(h.generator.structured_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_transcript_skips_feedback() {
    let h = harness(
        test_config(CallMode::Interview, Some("int-1")),
        MockGenerator::failing(),
    );

    h.session.begin().await.unwrap();
    h.voice.push(CallEvent::CallStart).await;
    settle().await;

    let outcome = h.session.end().await.unwrap();
    assert_eq!(outcome, EndOutcome::EmptyTranscript);
    assert_eq!(h.generator.structured_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn interview_mode_passes_bulleted_questions_to_the_provider() {
    let config = SessionConfig {
        questions: vec![
            "Tell me about yourself".to_string(),
            "Why this role".to_string(),
        ],
        ..test_config(CallMode::Interview, Some("int-1"))
    };
    let h = harness(config, MockGenerator::failing());

    h.session.begin().await.unwrap();

    let request = h.voice.last_request.lock().await.clone().unwrap();
    assert_eq!(request.mode, CallMode::Interview);
    assert_eq!(request.candidate_name, "Ada");
    assert_eq!(
        request.questions.as_deref(),
        Some("- Tell me about yourself\n- Why this role")
    );
}

#[tokio::test]
async fn generate_mode_passes_identity_without_questions() {
    let h = harness(test_config(CallMode::Generate, None), MockGenerator::failing());

    h.session.begin().await.unwrap();

    let request = h.voice.last_request.lock().await.clone().unwrap();
    assert_eq!(request.mode, CallMode::Generate);
    assert_eq!(request.candidate_id, "user-1");
    assert!(request.questions.is_none());
}

#[tokio::test]
async fn provider_call_end_finishes_the_session() {
    let h = harness(
        test_config(CallMode::Interview, Some("int-1")),
        MockGenerator::failing(),
    );

    h.session.begin().await.unwrap();
    h.voice.push(CallEvent::CallStart).await;
    h.voice.push(CallEvent::CallEnd).await;
    settle().await;

    assert_eq!(h.session.state(), SessionState::Finished);
}
