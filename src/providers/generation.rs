use serde_json::Value;

/// Failure classes for a model invocation.
///
/// `MalformedOutput` is kept separate because callers surface it differently:
/// a parse failure is fatal to the one request and is never retried.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation provider error: {0}")]
    Provider(String),

    #[error("malformed model output: {0}")]
    MalformedOutput(String),
}

/// Text-generation capability.
///
/// `generate_structured` asks the model for an object shaped by the prompt;
/// the raw JSON value is returned and the caller validates it against its own
/// schema (the provider does not enforce shape).
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;

    async fn generate_structured(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<Value, GenerationError>;
}
