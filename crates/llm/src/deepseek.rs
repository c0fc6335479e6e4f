use super::openai::{ApiKeyAuth, OpenAIClient, RequestCustomizer, SamplingParams};
use crate::sse::FragmentStream;
use crate::types::{Message, TransportError};
use crate::ChatProvider;
use async_trait::async_trait;

const SAMPLING: SamplingParams = SamplingParams {
    temperature: 1.0,
    top_p: None,
    max_tokens: 8192,
};

/// DeepSeek request customizer
pub struct DeepSeekRequestCustomizer;

impl RequestCustomizer for DeepSeekRequestCustomizer {
    fn customize_request(&self, request: &mut serde_json::Value) {
        SAMPLING.apply(request);
    }

    fn get_additional_headers(&self) -> Vec<(String, String)> {
        vec![("Content-Type".to_string(), "application/json".to_string())]
    }

    fn customize_url(&self, base_url: &str, _streaming: bool) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }
}

pub struct DeepSeekClient {
    inner: OpenAIClient,
}

impl DeepSeekClient {
    pub fn default_base_url() -> String {
        "https://api.deepseek.com/v1".to_string()
    }

    pub fn default_model() -> String {
        "deepseek-chat".to_string()
    }

    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            inner: OpenAIClient::with_customization(
                model,
                base_url,
                Box::new(ApiKeyAuth::new(api_key)),
                Box::new(DeepSeekRequestCustomizer),
            ),
        }
    }
}

#[async_trait]
impl ChatProvider for DeepSeekClient {
    async fn stream_chat(&self, messages: &[Message]) -> Result<FragmentStream, TransportError> {
        self.inner.stream_chat(messages).await
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, TransportError> {
        self.inner.chat(messages).await
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deepseek_sends_no_top_p() {
        let mut request = serde_json::json!({"model": "deepseek-chat"});
        DeepSeekRequestCustomizer.customize_request(&mut request);

        assert_eq!(request["temperature"], serde_json::json!(1.0));
        assert_eq!(request["max_tokens"], serde_json::json!(8192));
        assert!(request.get("top_p").is_none());
    }
}
