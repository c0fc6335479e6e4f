use super::openai::{ApiKeyAuth, OpenAIClient, RequestCustomizer, SamplingParams};
use crate::sse::FragmentStream;
use crate::types::{Message, TransportError};
use crate::ChatProvider;
use async_trait::async_trait;

const SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.95,
    top_p: Some(0.7),
    max_tokens: 8192,
};

/// Zhipu AI (GLM) request customizer
pub struct ZhipuRequestCustomizer;

impl RequestCustomizer for ZhipuRequestCustomizer {
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

pub struct ZhipuClient {
    inner: OpenAIClient,
}

impl ZhipuClient {
    pub fn default_base_url() -> String {
        "https://open.bigmodel.cn/api/paas/v4".to_string()
    }

    pub fn default_model() -> String {
        "glm-4-plus".to_string()
    }

    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        let auth_provider = Box::new(ApiKeyAuth::new(api_key));
        let request_customizer = Box::new(ZhipuRequestCustomizer);

        Self {
            inner: OpenAIClient::with_customization(
                model,
                base_url,
                auth_provider,
                request_customizer,
            ),
        }
    }
}

#[async_trait]
impl ChatProvider for ZhipuClient {
    async fn stream_chat(&self, messages: &[Message]) -> Result<FragmentStream, TransportError> {
        // The API is OpenAI compatible, only sampling parameters differ
        self.inner.stream_chat(messages).await
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, TransportError> {
        self.inner.chat(messages).await
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
