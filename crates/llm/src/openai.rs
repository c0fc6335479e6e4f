//! Client for OpenAI-compatible chat completion endpoints.
//!
//! Provider variants reuse [`OpenAIClient`] and only plug in their own
//! [`AuthProvider`] and [`RequestCustomizer`].

use crate::sse::{self, FragmentStream};
use crate::types::{Message, TransportError};
use crate::{utils, ChatProvider};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trait for providing authentication headers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn get_auth_headers(&self) -> Result<Vec<(String, String)>, TransportError>;
}

/// Trait for customizing requests before sending
pub trait RequestCustomizer: Send + Sync {
    fn customize_request(&self, request: &mut serde_json::Value);
    fn get_additional_headers(&self) -> Vec<(String, String)>;
    fn customize_url(&self, base_url: &str, streaming: bool) -> String;
}

/// Bearer token authentication
pub struct ApiKeyAuth {
    api_key: String,
}

impl ApiKeyAuth {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl AuthProvider for ApiKeyAuth {
    async fn get_auth_headers(&self) -> Result<Vec<(String, String)>, TransportError> {
        Ok(vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )])
    }
}

/// Fixed sampling parameters merged into every request of a provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: Option<f64>,
    pub max_tokens: u32,
}

impl SamplingParams {
    pub fn apply(&self, request: &mut serde_json::Value) {
        if let Some(obj) = request.as_object_mut() {
            obj.insert("temperature".to_string(), serde_json::json!(self.temperature));
            if let Some(top_p) = self.top_p {
                obj.insert("top_p".to_string(), serde_json::json!(top_p));
            }
            obj.insert("max_tokens".to_string(), serde_json::json!(self.max_tokens));
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OpenAIChatMessage<'a> {
    role: String,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAIClient {
    client: Client,
    base_url: String,
    model: String,
    auth_provider: Box<dyn AuthProvider>,
    request_customizer: Box<dyn RequestCustomizer>,
}

impl OpenAIClient {
    pub fn with_customization(
        model: String,
        base_url: String,
        auth_provider: Box<dyn AuthProvider>,
        request_customizer: Box<dyn RequestCustomizer>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url,
            model,
            auth_provider,
            request_customizer,
        }
    }

    fn get_url(&self, streaming: bool) -> String {
        self.request_customizer
            .customize_url(&self.base_url, streaming)
    }

    fn build_request_json(
        &self,
        messages: &[Message],
        streaming: bool,
    ) -> Result<serde_json::Value, TransportError> {
        let request = OpenAIRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|message| OpenAIChatMessage {
                    role: message.role.to_string(),
                    content: &message.content,
                })
                .collect(),
            stream: streaming,
        };

        let mut request_json = serde_json::to_value(request)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        self.request_customizer
            .customize_request(&mut request_json);
        Ok(request_json)
    }

    async fn send_request(
        &self,
        messages: &[Message],
        streaming: bool,
    ) -> Result<Response, TransportError> {
        let request_json = self.build_request_json(messages, streaming)?;
        let url = self.get_url(streaming);
        debug!("Sending request to {}: {}", url, request_json);

        let mut request_builder = self.client.post(url);

        for (key, value) in self.auth_provider.get_auth_headers().await? {
            request_builder = request_builder.header(key, value);
        }

        for (key, value) in self.request_customizer.get_additional_headers() {
            request_builder = request_builder.header(key, value);
        }

        let response = request_builder
            .json(&request_json)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        utils::check_response_error(response).await
    }
}

#[async_trait]
impl ChatProvider for OpenAIClient {
    async fn stream_chat(&self, messages: &[Message]) -> Result<FragmentStream, TransportError> {
        let response = self.send_request(messages, true).await?;
        Ok(sse::text_fragments(response.bytes_stream()))
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, TransportError> {
        let response = self.send_request(messages, false).await?;

        let response_text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let openai_response: OpenAIResponse = serde_json::from_str(&response_text)
            .map_err(|e| TransportError::MalformedResponse(format!("{e}: {response_text}")))?;

        openai_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                TransportError::MalformedResponse(format!("No choices in response: {response_text}"))
            })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PlainCustomizer;

    impl RequestCustomizer for PlainCustomizer {
        fn customize_request(&self, _request: &mut serde_json::Value) {}

        fn get_additional_headers(&self) -> Vec<(String, String)> {
            Vec::new()
        }

        fn customize_url(&self, base_url: &str, _streaming: bool) -> String {
            base_url.to_string()
        }
    }

    #[test]
    fn test_request_json_keeps_history_order() {
        let client = OpenAIClient::with_customization(
            "test-model".to_string(),
            "http://localhost".to_string(),
            Box::new(ApiKeyAuth::new("key".to_string())),
            Box::new(PlainCustomizer),
        );
        let messages = vec![
            Message::new_system("rules"),
            Message::new_user("Hi"),
            Message::new_assistant("Hello"),
        ];

        let json = client.build_request_json(&messages, true).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "test-model",
                "stream": true,
                "messages": [
                    {"role": "system", "content": "rules"},
                    {"role": "user", "content": "Hi"},
                    {"role": "assistant", "content": "Hello"}
                ]
            })
        );
    }

    #[test]
    fn test_sampling_params_apply() {
        let mut request = serde_json::json!({"model": "m"});
        SamplingParams {
            temperature: 0.95,
            top_p: Some(0.7),
            max_tokens: 8192,
        }
        .apply(&mut request);
        assert_eq!(
            request,
            serde_json::json!({"model": "m", "temperature": 0.95, "top_p": 0.7, "max_tokens": 8192})
        );
    }
}
