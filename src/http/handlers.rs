use super::state::AppState;
use crate::interview::{self, QuestionSetRequest};
use crate::providers::CallMode;
use crate::session::{CallSession, EndOutcome, SessionConfig, SessionState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub mode: CallMode,
    pub candidate_name: String,
    pub user_id: String,

    /// Interview the session scores (interview mode).
    pub interview_id: Option<String>,

    /// Existing feedback record to overwrite (re-score).
    pub feedback_id: Option<String>,

    /// Questions the assistant works through (interview mode).
    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub state: SessionState,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub session_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
    /// Where the UI should navigate next. Failures redirect to a safe
    /// fallback rather than exposing error detail.
    pub redirect: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub state: SessionState,
    pub is_speaking: bool,
    pub transcript_turns: usize,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsResponse {
    pub interview_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions/start
/// Create a session and begin the call
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> impl IntoResponse {
    let config = SessionConfig {
        mode: req.mode,
        assistant_id: state.defaults.assistant_id.clone(),
        candidate_name: req.candidate_name,
        user_id: req.user_id,
        interview_id: req.interview_id,
        feedback_id: req.feedback_id,
        questions: req.questions,
        grace_delay: state.defaults.grace_delay,
        ..SessionConfig::default()
    };
    let session_id = config.session_id.clone();

    info!("Starting session {} ({:?} mode)", session_id, req.mode);

    let session = Arc::new(CallSession::new(
        config,
        Arc::clone(&state.voice),
        Arc::clone(&state.store),
        Arc::clone(&state.feedback),
    ));

    if let Err(e) = session.begin().await {
        error!("Failed to begin session {}: {:#}", session_id, e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to start call session".to_string(),
            }),
        )
            .into_response();
    }

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(session_id.clone(), Arc::clone(&session));
    }

    (
        StatusCode::OK,
        Json(StartSessionResponse {
            session_id,
            state: session.state(),
        }),
    )
        .into_response()
}

/// POST /sessions/:session_id/stop
/// End the call and run the post-call hand-off
pub async fn stop_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&session_id)
    };

    let Some(session) = session else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", session_id),
            }),
        )
            .into_response();
    };

    match session.end().await {
        Ok(outcome) => {
            let feedback_redirect = session
                .interview_id()
                .map(|id| format!("/interview/{}/feedback", id));

            let (status, feedback_id, redirect) = match outcome {
                EndOutcome::Feedback(crate::feedback::FeedbackOutcome::Saved { feedback_id }) => (
                    "feedback_saved",
                    Some(feedback_id),
                    feedback_redirect.unwrap_or_else(|| "/".to_string()),
                ),
                EndOutcome::Feedback(crate::feedback::FeedbackOutcome::Failed) => {
                    ("feedback_failed", None, "/".to_string())
                }
                EndOutcome::QuestionSession => ("question_session", None, "/".to_string()),
                EndOutcome::MissingInterview => ("no_interview", None, "/".to_string()),
                EndOutcome::EmptyTranscript => ("no_transcript", None, "/".to_string()),
                EndOutcome::AlreadyEnded => ("already_ended", None, "/".to_string()),
            };

            (
                StatusCode::OK,
                Json(StopSessionResponse {
                    session_id,
                    status: status.to_string(),
                    feedback_id,
                    redirect,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to stop session {}: {:#}", session_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to stop call session".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /sessions/:session_id
/// Observable session state
pub async fn session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => (
            StatusCode::OK,
            Json(SessionStatusResponse {
                session_id,
                state: session.state(),
                is_speaking: session.is_speaking(),
                transcript_turns: session.transcript_len().await,
            }),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", session_id),
            }),
        )
            .into_response(),
    }
}

/// POST /feedback
/// Run one feedback cycle directly (re-scoring with overrides)
pub async fn generate_feedback(
    State(state): State<AppState>,
    Json(req): Json<crate::feedback::FeedbackRequest>,
) -> impl IntoResponse {
    #[derive(Serialize)]
    struct FeedbackResponse {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        feedback_id: Option<String>,
    }

    let outcome = state.feedback.generate(req).await;
    let response = match outcome {
        crate::feedback::FeedbackOutcome::Saved { feedback_id } => FeedbackResponse {
            success: true,
            feedback_id: Some(feedback_id),
        },
        crate::feedback::FeedbackOutcome::Failed => FeedbackResponse {
            success: false,
            feedback_id: None,
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /interviews/generate
/// One-shot question-set generation
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(req): Json<QuestionSetRequest>,
) -> impl IntoResponse {
    match state.question_sets.generate(req).await {
        Ok(interview_id) => (
            StatusCode::OK,
            Json(GenerateQuestionsResponse { interview_id }),
        )
            .into_response(),
        Err(e) => {
            error!("Question-set generation failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("{:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /interviews/:interview_id
pub async fn get_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> impl IntoResponse {
    match interview::interview_by_id(state.store.as_ref(), &interview_id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Interview {} not found", interview_id),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to read interview {}: {:#}", interview_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to read interview".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /interviews/:interview_id/feedback?user_id=
pub async fn get_interview_feedback(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    match interview::feedback_for_interview(state.store.as_ref(), &interview_id, &query.user_id)
        .await
    {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No feedback for interview {}", interview_id),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(
                "Failed to read feedback for interview {}: {:#}",
                interview_id, e
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to read feedback".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /interviews?user_id=
/// The caller's own interviews, newest first
pub async fn list_interviews(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    match interview::interviews_by_user(state.store.as_ref(), &query.user_id).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => {
            error!("Failed to list interviews: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list interviews".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /interviews/latest?user_id=&limit=
/// Finalized interviews by other users, newest first
pub async fn latest_interviews(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    match interview::latest_interviews(state.store.as_ref(), &query.user_id, query.limit).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => {
            error!("Failed to list latest interviews: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list interviews".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
