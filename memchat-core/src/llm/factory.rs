use super::providers::{GeminiProvider, MockProvider};
use crate::config::constants::providers;
use crate::llm::provider::{LLMError, LLMProvider};
use std::sync::Arc;
use std::time::Duration;

/// Settings needed to construct a provider
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout: Option<Duration>,
}

/// Create a provider by name.
///
/// The mock provider needs no API key; every other provider does.
pub fn create_provider(
    name: &str,
    config: ProviderConfig,
) -> Result<Arc<dyn LLMProvider>, LLMError> {
    match name.trim().to_ascii_lowercase().as_str() {
        providers::GEMINI => {
            let api_key = config
                .api_key
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    LLMError::Authentication("Gemini: no API key configured".to_string())
                })?;
            let provider = GeminiProvider::from_config(
                api_key,
                config.model,
                config.base_url,
                config.timeout,
            )?;
            Ok(Arc::new(provider))
        }
        providers::MOCK => Ok(Arc::new(MockProvider::new())),
        other => Err(LLMError::InvalidRequest(format!(
            "Unsupported provider: {other}"
        ))),
    }
}
