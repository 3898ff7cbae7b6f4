use anyhow::Result;
use serde_json::Value;

use super::models::{FeedbackRecord, InterviewRecord, FEEDBACK_COLLECTION, INTERVIEWS_COLLECTION};
use crate::providers::{DocumentStore, Filter, SortOrder};

/// Default page size for interview listings.
pub const DEFAULT_LATEST_LIMIT: usize = 20;

fn decode<T: serde::de::DeserializeOwned>(data: Value) -> Option<T> {
    serde_json::from_value(data).ok()
}

/// Fetch one interview, or `None` if the id is unknown.
pub async fn interview_by_id(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<InterviewRecord>> {
    let doc = store.get_document(INTERVIEWS_COLLECTION, id).await?;
    Ok(doc.and_then(decode))
}

/// The feedback record a user received for one interview, if a feedback
/// cycle has completed.
pub async fn feedback_for_interview(
    store: &dyn DocumentStore,
    interview_id: &str,
    user_id: &str,
) -> Result<Option<FeedbackRecord>> {
    let docs = store
        .query_documents(
            FEEDBACK_COLLECTION,
            &[
                Filter::eq("interview_id", interview_id),
                Filter::eq("user_id", user_id),
            ],
            None,
            Some(1),
        )
        .await?;

    Ok(docs.into_iter().next().and_then(|doc| decode(doc.data)))
}

/// Finalized interviews by other users, newest first.
pub async fn latest_interviews(
    store: &dyn DocumentStore,
    user_id: &str,
    limit: Option<usize>,
) -> Result<Vec<InterviewRecord>> {
    let docs = store
        .query_documents(
            INTERVIEWS_COLLECTION,
            &[Filter::eq("finalized", true), Filter::ne("user_id", user_id)],
            Some(SortOrder::desc("created_at")),
            Some(limit.unwrap_or(DEFAULT_LATEST_LIMIT)),
        )
        .await?;

    Ok(docs.into_iter().filter_map(|doc| decode(doc.data)).collect())
}

/// All interviews belonging to one user, newest first.
pub async fn interviews_by_user(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Vec<InterviewRecord>> {
    let docs = store
        .query_documents(
            INTERVIEWS_COLLECTION,
            &[Filter::eq("user_id", user_id)],
            Some(SortOrder::desc("created_at")),
            None,
        )
        .await?;

    Ok(docs.into_iter().filter_map(|doc| decode(doc.data)).collect())
}
