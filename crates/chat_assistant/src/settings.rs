use anyhow::{Context, Result};
use llm::{ConfigurationError, ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings loaded from ~/.config/chat-assistant/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssistantSettings {
    /// Selected provider id, validated when a client is built
    pub provider: String,
    pub zhipu: ProviderSettings,
    pub deepseek: ProviderSettings,
    /// Maximum number of chained tool continuations per user message.
    /// Unbounded when absent.
    pub max_continuation_depth: Option<u32>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Zhipu.to_string(),
            zhipu: ProviderSettings::default(),
            deepseek: ProviderSettings::default(),
            max_continuation_depth: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Values given on the command line, applied on top of the settings file
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_continuation_depth: Option<u32>,
}

impl AssistantSettings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    pub fn apply_overrides(&mut self, overrides: &SettingsOverrides) {
        if let Some(provider) = overrides.provider {
            self.provider = provider.to_string();
        }
        if overrides.model.is_some() || overrides.base_url.is_some() {
            let section = match self.provider_kind() {
                Ok(ProviderKind::Zhipu) => &mut self.zhipu,
                Ok(ProviderKind::DeepSeek) => &mut self.deepseek,
                Err(_) => return,
            };
            if let Some(model) = &overrides.model {
                section.model = Some(model.clone());
            }
            if let Some(base_url) = &overrides.base_url {
                section.base_url = Some(base_url.clone());
            }
        }
        if overrides.max_continuation_depth.is_some() {
            self.max_continuation_depth = overrides.max_continuation_depth;
        }
    }

    pub fn provider_kind(&self) -> Result<ProviderKind, ConfigurationError> {
        self.provider.parse()
    }

    /// Resolve the provider configuration using the process environment
    pub fn resolve_provider_config(&self) -> Result<ProviderConfig, ConfigurationError> {
        self.resolve_provider_config_with(|name| std::env::var(name).ok())
    }

    /// Resolve the provider configuration.
    ///
    /// `${VAR}` references in the API key are substituted from `env`. Without
    /// a configured key, `ZHIPU_API_KEY` / `DEEPSEEK_API_KEY` are consulted.
    pub fn resolve_provider_config_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ProviderConfig, ConfigurationError> {
        let provider = self.provider_kind()?;
        let (section, env_key) = match provider {
            ProviderKind::Zhipu => (&self.zhipu, "ZHIPU_API_KEY"),
            ProviderKind::DeepSeek => (&self.deepseek, "DEEPSEEK_API_KEY"),
        };

        let api_key = section
            .api_key
            .as_deref()
            .and_then(|key| substitute_env_vars(key, &env))
            .or_else(|| env(env_key))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigurationError::MissingApiKey(provider.to_string()))?;

        Ok(ProviderConfig::new(provider, api_key)
            .with_model(section.model.clone())
            .with_base_url(section.base_url.clone()))
    }
}

/// Where settings come from: a file plus command line overrides.
///
/// Re-read whenever the host reports a configuration change.
#[derive(Debug, Clone)]
pub struct SettingsSource {
    path: Option<PathBuf>,
    overrides: SettingsOverrides,
}

impl SettingsSource {
    pub fn new(path: Option<PathBuf>, overrides: SettingsOverrides) -> Self {
        Self { path, overrides }
    }

    pub fn load(&self) -> Result<AssistantSettings> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => default_settings_path()?,
        };
        let mut settings = AssistantSettings::load_from_path(&path)?;
        settings.apply_overrides(&self.overrides);
        Ok(settings)
    }
}

pub fn default_settings_path() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home
        .join(".config")
        .join("chat-assistant")
        .join("settings.json"))
}

/// Replace `${VAR}` references. Returns `None` if a referenced variable is unset.
fn substitute_env_vars(input: &str, env: &impl Fn(&str) -> Option<String>) -> Option<String> {
    let mut result = input.to_string();
    while let Some(start) = result.find("${") {
        let end = start + result[start..].find('}')?;
        let var_name = &result[start + 2..end];
        let var_value = env(var_name)?;
        result.replace_range(start..=end, &var_value);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AssistantSettings::load_from_path(&dir.path().join("none.json")).unwrap();
        assert_eq!(settings, AssistantSettings::default());
        assert_eq!(settings.provider_kind(), Ok(ProviderKind::Zhipu));
    }

    #[test]
    fn test_load_partial_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"provider": "deepseek", "deepseek": {"api_key": "sk-1", "model": "deepseek-coder"}}"#,
        )
        .unwrap();

        let settings = AssistantSettings::load_from_path(&path).unwrap();
        let config = settings.resolve_provider_config_with(env_from(&[])).unwrap();
        assert_eq!(config.provider, ProviderKind::DeepSeek);
        assert_eq!(config.api_key, "sk-1");
        assert_eq!(config.model.as_deref(), Some("deepseek-coder"));
        assert_eq!(settings.max_continuation_depth, None);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ provider: ").unwrap();
        assert!(AssistantSettings::load_from_path(&path).is_err());
    }

    #[test]
    fn test_unknown_provider() {
        let settings = AssistantSettings {
            provider: "openai".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.resolve_provider_config_with(env_from(&[])),
            Err(ConfigurationError::UnknownProvider("openai".to_string()))
        );
    }

    #[test]
    fn test_api_key_resolution() {
        let mut settings = AssistantSettings::default();
        assert_eq!(
            settings.resolve_provider_config_with(env_from(&[])),
            Err(ConfigurationError::MissingApiKey("zhipu".to_string()))
        );

        let config = settings
            .resolve_provider_config_with(env_from(&[("ZHIPU_API_KEY", "from-env")]))
            .unwrap();
        assert_eq!(config.api_key, "from-env");

        settings.zhipu.api_key = Some("${MY_KEY}".to_string());
        let config = settings
            .resolve_provider_config_with(env_from(&[("MY_KEY", "substituted")]))
            .unwrap();
        assert_eq!(config.api_key, "substituted");

        settings.zhipu.api_key = Some(String::new());
        assert!(settings.resolve_provider_config_with(env_from(&[])).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut settings = AssistantSettings::default();
        settings.apply_overrides(&SettingsOverrides {
            provider: Some(ProviderKind::DeepSeek),
            model: Some("deepseek-reasoner".to_string()),
            base_url: Some("http://localhost:9000".to_string()),
            max_continuation_depth: Some(3),
        });

        assert_eq!(settings.provider, "deepseek");
        assert_eq!(settings.deepseek.model.as_deref(), Some("deepseek-reasoner"));
        assert_eq!(
            settings.deepseek.base_url.as_deref(),
            Some("http://localhost:9000")
        );
        assert_eq!(settings.zhipu, ProviderSettings::default());
        assert_eq!(settings.max_continuation_depth, Some(3));
    }

    #[test]
    fn test_settings_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"max_continuation_depth": 5}"#).unwrap();

        let source = SettingsSource::new(Some(path), SettingsOverrides::default());
        assert_eq!(source.load().unwrap().max_continuation_depth, Some(5));
    }
}
