use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::analysis::FeedbackAnalysis;
use super::prompt::{analysis_prompt, format_transcript, ANALYSIS_SYSTEM};
use crate::interview::{
    split_tech_stack, FeedbackRecord, FeedbackSummary, FEEDBACK_COLLECTION, INTERVIEWS_COLLECTION,
};
use crate::providers::{DocumentStore, TextGenerator};
use crate::session::TurnRecord;

/// Fallbacks when neither an override nor a persisted value exists.
const FALLBACK_ROLE: &str = "Not specified";
const FALLBACK_TYPE: &str = "General";

/// Input for one feedback cycle.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FeedbackRequest {
    pub interview_id: String,
    pub user_id: String,
    pub transcript: Vec<TurnRecord>,
    /// Overwrite this record instead of creating a new one (re-score).
    #[serde(default)]
    pub feedback_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub tech_stack: Option<String>,
    #[serde(default)]
    pub interview_type: Option<String>,
}

/// Discriminated result of a feedback cycle. Failures are reported, never
/// raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Saved { feedback_id: String },
    Failed,
}

impl FeedbackOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, FeedbackOutcome::Saved { .. })
    }
}

/// Turns a finalized transcript into a scored, persisted feedback report.
///
/// Sole writer of feedback records and of the `feedback` / `finalized` /
/// `role` / `tech_stack` / `interview_type` fields on interview records.
/// The two persistence writes are sequential and not atomic: a failure of the
/// interview merge leaves an orphan feedback record behind, but never a
/// finalized interview without feedback.
pub struct FeedbackPipeline {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn DocumentStore>,
}

impl FeedbackPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, store: Arc<dyn DocumentStore>) -> Self {
        Self { generator, store }
    }

    /// Run one feedback cycle.
    ///
    /// An empty transcript short-circuits before the model is invoked. Every
    /// error past that point is caught here, logged, and degrades the whole
    /// cycle to `Failed`.
    pub async fn generate(&self, request: FeedbackRequest) -> FeedbackOutcome {
        info!(
            "Feedback cycle for interview {} ({} turns, feedback_id={:?})",
            request.interview_id,
            request.transcript.len(),
            request.feedback_id
        );

        if request.transcript.is_empty() {
            warn!(
                "Empty transcript for interview {}; skipping analysis",
                request.interview_id
            );
            return FeedbackOutcome::Failed;
        }

        match self.run(&request).await {
            Ok(feedback_id) => {
                info!(
                    "Feedback {} saved for interview {}",
                    feedback_id, request.interview_id
                );
                FeedbackOutcome::Saved { feedback_id }
            }
            Err(e) => {
                error!(
                    "Feedback cycle failed for interview {}: {:#}",
                    request.interview_id, e
                );
                FeedbackOutcome::Failed
            }
        }
    }

    async fn run(&self, request: &FeedbackRequest) -> Result<String> {
        let formatted = format_transcript(&request.transcript);

        let raw = self
            .generator
            .generate_structured(&analysis_prompt(&formatted), ANALYSIS_SYSTEM)
            .await
            .context("Analysis generation failed")?;
        let analysis = FeedbackAnalysis::from_value(raw)?;

        // Supplied id means overwrite-in-place; otherwise mint a fresh one.
        let feedback_id = request
            .feedback_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let created_at = Utc::now();

        let record = FeedbackRecord {
            id: feedback_id.clone(),
            interview_id: request.interview_id.clone(),
            user_id: request.user_id.clone(),
            total_score: analysis.total_score,
            category_scores: analysis.category_scores.clone(),
            strengths: analysis.strengths.clone(),
            areas_for_improvement: analysis.areas_for_improvement.clone(),
            final_assessment: analysis.final_assessment.clone(),
            created_at,
        };

        self.store
            .set_document(
                FEEDBACK_COLLECTION,
                &feedback_id,
                serde_json::to_value(&record)?,
            )
            .await
            .context("Failed to persist feedback record")?;

        let existing = self
            .store
            .get_document(INTERVIEWS_COLLECTION, &request.interview_id)
            .await
            .context("Failed to read interview record")?
            .unwrap_or(Value::Null);

        let patch = Self::interview_patch(request, &analysis, &existing)?;
        self.store
            .update_document(INTERVIEWS_COLLECTION, &request.interview_id, patch)
            .await
            .context("Failed to update interview record")?;

        Ok(feedback_id)
    }

    /// Merge-not-overwrite: an override wins, otherwise the persisted value
    /// is kept, otherwise the fallback applies. Prior data is never shrunk.
    fn interview_patch(
        request: &FeedbackRequest,
        analysis: &FeedbackAnalysis,
        existing: &Value,
    ) -> Result<Value> {
        // Empty strings count as absent, so a blank placeholder never
        // shadows the fallback.
        let role = request
            .role
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                existing
                    .get("role")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            })
            .unwrap_or_else(|| FALLBACK_ROLE.to_string());

        let tech_stack: Vec<String> = match request
            .tech_stack
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            Some(raw) => split_tech_stack(raw),
            None => existing
                .get("tech_stack")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        };

        let interview_type = request
            .interview_type
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                existing
                    .get("interview_type")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            })
            .unwrap_or_else(|| FALLBACK_TYPE.to_string());

        let summary = FeedbackSummary {
            total_score: analysis.total_score,
            category_scores: analysis.category_scores.clone(),
            strengths: analysis.strengths.clone(),
            areas_for_improvement: analysis.areas_for_improvement.clone(),
            final_assessment: analysis.final_assessment.clone(),
            created_at: Utc::now(),
        };

        Ok(json!({
            "finalized": true,
            "role": role,
            "tech_stack": tech_stack,
            "interview_type": interview_type,
            "feedback": serde_json::to_value(&summary)?,
        }))
    }
}
