use crate::config::ProfileConfig;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderType {
    System,
    Assistant,
    User,
}

impl From<SenderType> for String {
    fn from(val: SenderType) -> Self {
        val.as_str().into()
    }
}

impl SenderType {
    pub fn as_str(&self) -> &'static str {
        match &self {
            SenderType::System => "system",
            SenderType::User => "user",
            SenderType::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: SenderType,
}

impl ChatMessage {
    pub fn new(sender: SenderType, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompletionMetrics {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub completion_latency_ms: f32,
}

#[derive(Debug)]
pub struct CompletionResponse {
    pub text: String,
    pub finish_reason: Option<String>,
    pub metrics: CompletionMetrics,
}

/// Failure reported by a completion service.
///
/// The `Display` output is shown to the user verbatim after an `Error: `
/// prefix, so variants carry a human readable description rather than a
/// structured cause chain.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Request timed out.")]
    Timeout,
    #[error("{0}")]
    Transport(String),
    #[error("Error code: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Timeout
        } else if err.is_decode() {
            CompletionError::InvalidResponse(err.to_string())
        } else {
            CompletionError::Transport(format!("Connection error: {err}"))
        }
    }
}

#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Model identifier sent with every request.
    fn name(&self) -> &str;

    /// Generate exactly one continuation for `messages`.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        profile: &ProfileConfig,
    ) -> Result<CompletionResponse, CompletionError>;
}
