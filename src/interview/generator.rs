use anyhow::{Context, Result};
use chrono::Utc;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::models::{split_tech_stack, InterviewRecord, INTERVIEWS_COLLECTION};
use crate::providers::{DocumentStore, GenerationError, TextGenerator};

/// Cover images assigned round-robin-by-chance to new interviews.
const INTERVIEW_COVERS: &[&str] = &[
    "/covers/adobe.png",
    "/covers/amazon.png",
    "/covers/facebook.png",
    "/covers/hostinger.png",
    "/covers/pinterest.png",
    "/covers/quora.png",
    "/covers/reddit.png",
    "/covers/skype.png",
    "/covers/spotify.png",
    "/covers/telegram.png",
    "/covers/tiktok.png",
    "/covers/yahoo.png",
];

fn random_cover() -> String {
    INTERVIEW_COVERS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(INTERVIEW_COVERS[0])
        .to_string()
}

/// Input for one question-set generation.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSetRequest {
    pub role: String,
    pub level: String,
    pub tech_stack: String,
    pub interview_type: String,
    pub amount: u32,
    pub user_id: String,
}

/// The JSON bundle the model is instructed to return, and nothing else.
///
/// `amount` is templated as a string in the prompt, so numeric strings are
/// accepted alongside numbers.
#[derive(Debug, Deserialize)]
struct GeneratedQuestionSet {
    role: String,
    level: String,
    techstack: String,
    #[serde(rename = "type")]
    interview_type: String,
    #[serde(deserialize_with = "amount_field")]
    #[allow(dead_code)]
    amount: u32,
    questions: Vec<String>,
}

fn amount_field<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// One-shot pipeline: prompt the model for an interview-question bundle and
/// persist it as a new, finalized interview record.
pub struct QuestionSetGenerator {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn DocumentStore>,
}

impl QuestionSetGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, store: Arc<dyn DocumentStore>) -> Self {
        Self { generator, store }
    }

    /// Generate and persist a question set; returns the new interview id.
    ///
    /// A response that does not parse as the exact JSON shape is a hard
    /// error for this call (`GenerationError::MalformedOutput`), not retried.
    pub async fn generate(&self, request: QuestionSetRequest) -> Result<String> {
        info!(
            "Generating {} questions for role {:?} ({})",
            request.amount, request.role, request.interview_type
        );

        let text = self
            .generator
            .generate_text(&question_prompt(&request))
            .await
            .context("Question generation failed")?;

        let bundle: GeneratedQuestionSet = serde_json::from_str(text.trim())
            .map_err(|e| GenerationError::MalformedOutput(e.to_string()))
            .context("Model did not return the question-set JSON shape")?;

        let interview_id = uuid::Uuid::new_v4().to_string();
        let record = InterviewRecord {
            id: interview_id.clone(),
            user_id: request.user_id.clone(),
            role: bundle.role,
            level: bundle.level,
            tech_stack: split_tech_stack(&bundle.techstack),
            interview_type: bundle.interview_type,
            questions: bundle.questions,
            finalized: true,
            cover_image: random_cover(),
            created_at: Utc::now(),
            feedback: None,
        };

        self.store
            .set_document(
                INTERVIEWS_COLLECTION,
                &interview_id,
                serde_json::to_value(&record)?,
            )
            .await
            .context("Failed to persist interview record")?;

        info!(
            "Interview {} created with {} questions",
            interview_id,
            record.questions.len()
        );
        Ok(interview_id)
    }
}

/// Create the empty interview shell a generate-mode call fills in later.
/// Invoked exactly once, at session start.
pub async fn create_placeholder_interview(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<String> {
    let interview_id = uuid::Uuid::new_v4().to_string();
    let record = InterviewRecord {
        id: interview_id.clone(),
        user_id: user_id.to_string(),
        role: String::new(),
        level: String::new(),
        tech_stack: Vec::new(),
        interview_type: String::new(),
        questions: Vec::new(),
        finalized: false,
        cover_image: random_cover(),
        created_at: Utc::now(),
        feedback: None,
    };

    store
        .set_document(
            INTERVIEWS_COLLECTION,
            &interview_id,
            serde_json::to_value(&record)?,
        )
        .await?;

    Ok(interview_id)
}

/// The single natural-language prompt for the question bundle. Output must be
/// voice-safe (read aloud by a speech synthesizer) and JSON only.
fn question_prompt(request: &QuestionSetRequest) -> String {
    format!(
        "Prepare questions for a job interview.\n\
         The job role is {role}.\n\
         The job experience level is {level}.\n\
         The tech stack used in the job is: {tech_stack}.\n\
         The focus between behavioural and technical questions should lean towards: {focus}.\n\
         The amount of questions required is: {amount}.\n\
         The questions are going to be read by a voice assistant so do not use \"/\" or \"*\" \
         or any other special characters which might break the voice assistant.\n\
         At the end, output ONLY a valid JSON object with this structure (no explanation, \
         no extra text, no markdown, no code block):\n\
         {{\n\
           \"role\": \"...\",\n\
           \"level\": \"...\",\n\
           \"techstack\": \"...\",\n\
           \"type\": \"...\",\n\
           \"amount\": \"...\",\n\
           \"questions\": [\"Question 1\", \"Question 2\", ...]\n\
         }}\n\
         Do NOT say \"Here is the JSON\", do NOT add any extra words, do NOT use markdown or \
         code blocks. Only output the JSON object as your last message.\n",
        role = request.role,
        level = request.level,
        tech_stack = request.tech_stack,
        focus = request.interview_type,
        amount = request.amount,
    )
}
