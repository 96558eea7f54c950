//! Deterministic provider for offline runs and tests.
//!
//! Scripted steps are consumed in order; once the script is exhausted the
//! provider echoes the last user message.

use crate::config::constants::{models, providers};
use crate::llm::provider::{LLMError, LLMProvider, LLMRequest, LLMResponse, MessageRole};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockStep {
    Text(String),
    Error(MockFailure),
}

/// Failure kinds a step can simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    RateLimit,
    Network,
    Provider,
}

impl MockStep {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    pub fn failure(kind: MockFailure) -> Self {
        Self::Error(kind)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<MockStep>>>,
    requests: Arc<Mutex<Vec<LLMRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<MockStep>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::from(steps))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn echo(request: &LLMRequest) -> LLMResponse {
        let text = request
            .messages
            .iter()
            .rev()
            .find(|message| message.role == MessageRole::User)
            .map(|message| format!("mock-echo: {}", message.content))
            .unwrap_or_else(|| "mock-ok".to_string());
        LLMResponse::text(text)
    }
}

#[async_trait]
impl LLMProvider for MockProvider {
    fn name(&self) -> &str {
        providers::MOCK
    }

    async fn generate(&self, request: LLMRequest) -> Result<LLMResponse, LLMError> {
        self.requests.lock().push(request.clone());
        let step = self.script.lock().pop_front();
        match step {
            Some(MockStep::Text(text)) => Ok(LLMResponse::text(text)),
            Some(MockStep::Error(MockFailure::RateLimit)) => Err(LLMError::RateLimit),
            Some(MockStep::Error(MockFailure::Network)) => Err(LLMError::Network(
                "mock: simulated timeout".to_string(),
            )),
            Some(MockStep::Error(MockFailure::Provider)) => Err(LLMError::Provider(
                "mock: simulated provider failure".to_string(),
            )),
            None => Ok(Self::echo(&request)),
        }
    }

    fn supported_models(&self) -> Vec<String> {
        vec![models::mock::DEFAULT_MODEL.to_string()]
    }

    fn validate_request(&self, _request: &LLMRequest) -> Result<(), LLMError> {
        Ok(())
    }
}
