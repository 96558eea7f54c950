use crate::config::constants::defaults;
use crate::llm::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model and provider settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AgentConfig {
    /// AI provider (gemini, mock)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model used for both replies and summaries
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Optional system instruction sent with every reply request (empty = none)
    #[serde(default)]
    pub system_prompt: String,

    /// HTTP timeout for a single model call; 0 disables it
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            default_model: default_model(),
            api_key_env: default_api_key_env(),
            system_prompt: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            max_tokens: None,
            temperature: None,
        }
    }
}

impl AgentConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn system_prompt(&self) -> Option<String> {
        let trimmed = self.system_prompt.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Provider construction settings derived from this section.
    pub fn provider_config(&self, api_key: Option<String>) -> ProviderConfig {
        ProviderConfig {
            api_key,
            base_url: None,
            model: Some(self.default_model.clone()),
            timeout: self.request_timeout(),
        }
    }
}

fn default_provider() -> String {
    defaults::DEFAULT_PROVIDER.to_string()
}
fn default_model() -> String {
    defaults::DEFAULT_MODEL.to_string()
}
fn default_api_key_env() -> String {
    defaults::DEFAULT_API_KEY_ENV.to_string()
}
fn default_request_timeout_secs() -> u64 {
    defaults::DEFAULT_REQUEST_TIMEOUT_SECS
}
