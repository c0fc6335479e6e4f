//! LLM integration module providing abstraction over chat completion providers
//!
//! This module implements:
//! - Common interface for LLM interactions via the ChatProvider trait
//! - Support for the Zhipu AI and DeepSeek OpenAI-compatible APIs
//! - Server-sent event decoding for streamed responses
//! - Shared message and error types


mod utils;

pub mod deepseek;
pub mod factory;
pub mod openai;
pub mod sse;
pub mod types;
pub mod zhipu;

pub use deepseek::DeepSeekClient;
pub use factory::{create_chat_client, ProviderConfig, ProviderKind};
pub use openai::OpenAIClient;
pub use sse::{DecodeError, FragmentStream, SseDecoder, StreamDelta};
pub use types::*;
pub use zhipu::ZhipuClient;

use async_trait::async_trait;

/// Trait for the different chat provider implementations
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Sends the history as-is and streams back the reply as text fragments.
    ///
    /// The request is issued before this returns; the fragment stream is
    /// finite and can only be consumed once.
    async fn stream_chat(&self, messages: &[Message]) -> Result<FragmentStream, TransportError>;

    /// Sends the history and waits for the complete reply
    async fn chat(&self, messages: &[Message]) -> Result<String, TransportError>;

    /// The model id requests are sent with
    fn model(&self) -> &str;
}
