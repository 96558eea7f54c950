use crate::config::constants::{models, providers, urls};
use crate::llm::provider::{
    FinishReason, LLMError, LLMProvider, LLMRequest, LLMResponse, MessageRole, Usage,
};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub struct GeminiProvider {
    api_key: String,
    http_client: HttpClient,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, models::google::DEFAULT_MODEL.to_string())
    }

    pub fn with_model(api_key: String, model: String) -> Self {
        Self {
            api_key,
            http_client: HttpClient::new(),
            base_url: urls::GEMINI_API_BASE.to_string(),
            model,
        }
    }

    /// Build a provider whose HTTP client gives up after `timeout`. A timed
    /// out call surfaces as [`LLMError::Network`].
    pub fn from_config(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LLMError> {
        let mut provider = match model {
            Some(model_value) => Self::with_model(api_key, model_value),
            None => Self::new(api_key),
        };
        if let Some(base) = base_url {
            provider.base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = timeout {
            provider.http_client = HttpClient::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| LLMError::Provider(format!("Gemini: failed to build client: {e}")))?;
        }
        Ok(provider)
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn name(&self) -> &str {
        providers::GEMINI
    }

    async fn generate(&self, request: LLMRequest) -> Result<LLMResponse, LLMError> {
        self.validate_request(&request)?;
        let gemini_request = self.convert_to_gemini_format(&request);

        // Key goes in a header; reqwest errors echo the URL.
        let model = self.resolve_model(&request);
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!(
            model = %model,
            messages = request.messages.len(),
            "sending Gemini generateContent request"
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                if e.is_timeout() {
                    LLMError::Network(format!("Gemini: request timed out: {e}"))
                } else {
                    LLMError::Network(format!("Gemini: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_http_error(status.as_u16(), &error_text));
        }

        let gemini_response: Value = response.json().await.map_err(|e| {
            LLMError::Provider(format!(
                "Gemini: failed to parse response: {}",
                e.without_url()
            ))
        })?;

        self.convert_from_gemini_format(gemini_response)
    }

    fn supported_models(&self) -> Vec<String> {
        models::google::SUPPORTED_MODELS
            .iter()
            .map(|model| model.to_string())
            .collect()
    }

    fn validate_request(&self, request: &LLMRequest) -> Result<(), LLMError> {
        if !request
            .messages
            .iter()
            .any(|message| message.role != MessageRole::System)
        {
            return Err(LLMError::InvalidRequest(
                "Gemini: request has no conversation messages".to_string(),
            ));
        }
        Ok(())
    }
}

fn classify_http_error(status: u16, error_text: &str) -> LLMError {
    let lowered = error_text.to_ascii_lowercase();
    if status == 429 || lowered.contains("quota") || lowered.contains("rate limit") {
        return LLMError::RateLimit;
    }
    if status == 401 || status == 403 {
        return LLMError::Authentication(format!("Gemini: HTTP {status}: {error_text}"));
    }
    LLMError::Provider(format!("Gemini: HTTP {status}: {error_text}"))
}

impl GeminiProvider {
    /// The request's model, or the provider's own when the request leaves it blank.
    fn resolve_model<'a>(&'a self, request: &'a LLMRequest) -> &'a str {
        if request.model.trim().is_empty() {
            &self.model
        } else {
            &request.model
        }
    }

    fn convert_to_gemini_format(&self, request: &LLMRequest) -> Value {
        let mut system_parts = Vec::new();
        if let Some(system) = &request.system_prompt {
            system_parts.push(json!({"text": system}));
        }

        let mut contents = Vec::new();
        for message in &request.messages {
            // System messages travel as systemInstruction, never in contents
            if message.role == MessageRole::System {
                if !message.content.is_empty() {
                    system_parts.push(json!({"text": message.content}));
                }
                continue;
            }

            contents.push(json!({
                "role": message.role.as_gemini_str(),
                "parts": [{"text": message.content}]
            }));
        }

        let mut gemini_request = json!({
            "contents": contents
        });

        if !system_parts.is_empty() {
            gemini_request["systemInstruction"] = json!({ "parts": system_parts });
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(max_tokens) = request.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if let Some(temperature) = request.temperature {
            generation_config.insert("temperature".to_string(), json!(temperature));
        }
        if !generation_config.is_empty() {
            gemini_request["generationConfig"] = Value::Object(generation_config);
        }

        gemini_request
    }

    fn convert_from_gemini_format(&self, response: Value) -> Result<LLMResponse, LLMError> {
        let Some(candidate) = response["candidates"]
            .as_array()
            .and_then(|candidates| candidates.first())
        else {
            if let Some(reason) = response["promptFeedback"]["blockReason"].as_str() {
                return Err(LLMError::Provider(format!(
                    "Gemini: prompt blocked ({reason})"
                )));
            }
            return Err(LLMError::Provider(
                "Gemini: no candidates in response".to_string(),
            ));
        };

        let text_content: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect()
            })
            .unwrap_or_default();

        let finish_reason = match candidate["finishReason"].as_str() {
            Some("STOP") | None => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("RECITATION") => FinishReason::ContentFilter,
            Some(other) => FinishReason::Error(other.to_string()),
        };

        let usage = response.get("usageMetadata").map(|meta| {
            let read = |key: &str| meta[key].as_u64().unwrap_or(0) as u32;
            Usage {
                prompt_tokens: read("promptTokenCount"),
                completion_tokens: read("candidatesTokenCount"),
                total_tokens: read("totalTokenCount"),
            }
        });

        Ok(LLMResponse {
            content: if text_content.is_empty() {
                None
            } else {
                Some(text_content)
            },
            usage,
            finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::Message;

    fn provider() -> GeminiProvider {
        GeminiProvider::with_model("test-key".to_string(), "gemini-2.0-flash".to_string())
    }

    #[test]
    fn request_uses_user_and_model_roles() {
        let request = LLMRequest::new(
            "gemini-2.0-flash",
            vec![
                Message::system("be brief".to_string()),
                Message::user("hi".to_string()),
                Message::assistant("hello".to_string()),
            ],
        )
        .with_max_tokens(Some(256))
        .with_temperature(Some(0.5));

        let body = provider().convert_to_gemini_format(&request);
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "hello");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
    }

    #[test]
    fn request_without_generation_options_omits_config() {
        let request = LLMRequest::new("gemini-2.0-flash", vec![Message::user("hi".to_string())]);
        let body = provider().convert_to_gemini_format(&request);
        assert!(body.get("generationConfig").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn response_text_parts_are_joined() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "world"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 2, "totalTokenCount": 6}
        });

        let response = provider().convert_from_gemini_format(raw).unwrap();
        assert_eq!(response.content.as_deref(), Some("Hello, world"));
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(
            response.usage,
            Some(Usage {
                prompt_tokens: 4,
                completion_tokens: 2,
                total_tokens: 6
            })
        );
    }

    #[test]
    fn missing_candidates_is_a_provider_error() {
        let blocked = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = provider().convert_from_gemini_format(blocked).unwrap_err();
        assert!(matches!(err, LLMError::Provider(msg) if msg.contains("SAFETY")));

        let empty = json!({});
        assert!(provider().convert_from_gemini_format(empty).is_err());
    }

    #[test]
    fn http_errors_are_classified() {
        assert!(matches!(classify_http_error(429, ""), LLMError::RateLimit));
        assert!(matches!(
            classify_http_error(400, "Quota exceeded for project"),
            LLMError::RateLimit
        ));
        assert!(matches!(
            classify_http_error(403, "API key not valid"),
            LLMError::Authentication(_)
        ));
        assert!(matches!(
            classify_http_error(500, "internal"),
            LLMError::Provider(_)
        ));
    }

    #[test]
    fn blank_request_model_falls_back_to_provider_model() {
        let provider = GeminiProvider::with_model("k".to_string(), "gemini-2.5-pro".to_string());
        let blank = LLMRequest::new("  ", vec![Message::user("hi".to_string())]);
        assert_eq!(provider.resolve_model(&blank), "gemini-2.5-pro");

        let explicit = LLMRequest::new("gemini-2.0-flash", vec![Message::user("hi".to_string())]);
        assert_eq!(provider.resolve_model(&explicit), "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn transport_error_does_not_expose_api_key() {
        let provider = GeminiProvider::from_config(
            "SECRET-KEY-123".to_string(),
            None,
            Some("http://127.0.0.1:1".to_string()),
            Some(Duration::from_secs(2)),
        )
        .unwrap();
        let request = LLMRequest::new("gemini-2.0-flash", vec![Message::user("hi".to_string())]);

        let err = provider.generate(request).await.unwrap_err();
        assert!(matches!(err, LLMError::Network(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }

    #[test]
    fn validate_rejects_system_only_requests() {
        let request = LLMRequest::new("gemini-2.0-flash", vec![Message::system("x".to_string())]);
        assert!(matches!(
            provider().validate_request(&request),
            Err(LLMError::InvalidRequest(_))
        ));
    }
}
