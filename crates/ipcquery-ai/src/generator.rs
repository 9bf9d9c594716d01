use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model returned no text: {0}")]
    NoText(String),
}

/// A text-generation service: prompt in, completion out.
///
/// Implementations may fail for any reason (network, auth, quota, refusal);
/// callers do not distinguish between them.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}
