use crate::types::ConfigurationError;
use crate::{ChatProvider, DeepSeekClient, ZhipuClient};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Zhipu,
    #[value(name = "deepseek")]
    DeepSeek,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Zhipu => "zhipu",
            ProviderKind::DeepSeek => "deepseek",
        }
    }

    /// Human readable provider name for user-facing messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Zhipu => "Zhipu AI",
            ProviderKind::DeepSeek => "DeepSeek",
        }
    }

    pub fn default_model(&self) -> String {
        match self {
            ProviderKind::Zhipu => ZhipuClient::default_model(),
            ProviderKind::DeepSeek => DeepSeekClient::default_model(),
        }
    }

    pub fn default_base_url(&self) -> String {
        match self {
            ProviderKind::Zhipu => ZhipuClient::default_base_url(),
            ProviderKind::DeepSeek => DeepSeekClient::default_base_url(),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zhipu" => Ok(ProviderKind::Zhipu),
            "deepseek" => Ok(ProviderKind::DeepSeek),
            _ => Err(ConfigurationError::UnknownProvider(s.to_string())),
        }
    }
}

/// Resolved configuration for building a chat client
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: None,
            base_url: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }
}

/// Build a chat client for the given configuration.
///
/// The returned client is immutable. A configuration change requires
/// building a new one.
pub fn create_chat_client(
    config: &ProviderConfig,
) -> Result<Box<dyn ChatProvider>, ConfigurationError> {
    if config.api_key.trim().is_empty() {
        return Err(ConfigurationError::MissingApiKey(
            config.provider.to_string(),
        ));
    }

    let model = config
        .model
        .clone()
        .filter(|model| !model.trim().is_empty())
        .unwrap_or_else(|| config.provider.default_model());
    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| config.provider.default_base_url());

    info!("Creating {} client with model {}", config.provider, model);

    Ok(match config.provider {
        ProviderKind::Zhipu => Box::new(ZhipuClient::new(
            config.api_key.clone(),
            model,
            base_url,
        )),
        ProviderKind::DeepSeek => Box::new(DeepSeekClient::new(
            config.api_key.clone(),
            model,
            base_url,
        )),
    })
}
