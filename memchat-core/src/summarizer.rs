//! Summarization of a window of conversation turns
//!
//! [`Summarizer`] is the seam the compaction policy calls through. The
//! production implementation, [`LlmSummarizer`], asks the chat model itself to
//! condense the window into a short note.

use crate::config::constants::prompts;
use crate::llm::{LLMError, LLMProvider, LLMRequest, Message};
use crate::transcript::Turn;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SummarizationError {
    #[error("summarization request failed: {0}")]
    Provider(#[from] LLMError),
    #[error("summarizer returned an empty summary")]
    EmptySummary,
    #[error("summarizer unavailable: {0}")]
    Unavailable(String),
}

/// Condenses a slice of turns into the text of a single summary turn.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, turns: &[Turn]) -> Result<String, SummarizationError>;
}

/// Render turns as the prompt sent to the model, one `ROLE: text` line each.
pub fn build_summary_prompt(turns: &[Turn]) -> String {
    let lines: Vec<String> = turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role().prompt_label(), turn.text()))
        .collect();
    format!("{}{}", prompts::SUMMARY_INSTRUCTION, lines.join("\n"))
}

/// Summarizer backed by an [`LLMProvider`].
#[derive(Clone)]
pub struct LlmSummarizer {
    provider: Arc<dyn LLMProvider>,
    model: String,
    max_tokens: Option<u32>,
}

impl LlmSummarizer {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, turns: &[Turn]) -> Result<String, SummarizationError> {
        let request = LLMRequest::new(
            self.model.clone(),
            vec![Message::user(build_summary_prompt(turns))],
        )
        .with_max_tokens(self.max_tokens);

        let response = self.provider.generate(request).await?;
        let text = response.content.unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            return Err(SummarizationError::EmptySummary);
        }

        tracing::debug!(
            provider = self.provider.name(),
            turns = turns.len(),
            chars = text.len(),
            "summarized conversation window"
        );
        Ok(format!("{}{}", prompts::SUMMARY_PREFIX, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockFailure, MockProvider, MockStep};
    use crate::transcript::TurnRole;

    fn window() -> Vec<Turn> {
        vec![
            Turn::new(TurnRole::User, "My name is Ada.", 5),
            Turn::new(TurnRole::Assistant, "Nice to meet you, Ada.", 6),
            Turn::new(TurnRole::SystemSummary, "[Summary of earlier conversation]: x", 7),
        ]
    }

    #[test]
    fn prompt_lists_turns_with_role_labels() {
        let prompt = build_summary_prompt(&window());
        assert!(prompt.starts_with("Summarize the following conversation messages."));
        assert!(prompt.contains("USER: My name is Ada.\nASSISTANT: Nice to meet you, Ada.\nSUMMARY: "));
    }

    #[tokio::test]
    async fn llm_summary_is_prefixed() {
        let provider = Arc::new(MockProvider::from_steps(vec![MockStep::text(
            "  User is Ada.  ",
        )]));
        let summarizer = LlmSummarizer::new(provider.clone(), "gemini-2.0-flash");

        let summary = summarizer.summarize(&window()).await.unwrap();
        assert_eq!(summary, "[Summary of earlier conversation]: User is Ada.");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].model, "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn provider_failure_and_empty_text_are_errors() {
        let provider = Arc::new(MockProvider::from_steps(vec![
            MockStep::failure(MockFailure::Network),
            MockStep::text("   "),
        ]));
        let summarizer = LlmSummarizer::new(provider, "gemini-2.0-flash");

        assert!(matches!(
            summarizer.summarize(&window()).await,
            Err(SummarizationError::Provider(LLMError::Network(_)))
        ));
        assert!(matches!(
            summarizer.summarize(&window()).await,
            Err(SummarizationError::EmptySummary)
        ));
    }
}
