use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single entry of the conversation history
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn new_system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn new_user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn new_assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Errors raised while talking to an LLM provider.
///
/// Every variant carries the message reported by the provider (or the
/// underlying HTTP client) so it can be shown to the user unmodified.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors raised while building a provider client from configuration
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigurationError {
    #[error("Unsupported AI provider: {0}")]
    UnknownProvider(String),

    #[error("No API key configured for provider '{0}'")]
    MissingApiKey(String),
}
