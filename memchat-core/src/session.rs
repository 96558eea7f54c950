//! One chat conversation with bounded memory
//!
//! A [`ChatSession`] owns the transcript of a single session. Each call to
//! [`ChatSession::send`] runs one full turn:
//!
//! 1. append the user's input,
//! 2. compact the transcript if it has grown past the threshold,
//! 3. ask the model for a reply,
//! 4. append the reply and checkpoint the transcript.
//!
//! `send` takes `&mut self`, so a session never has two requests in flight.

use crate::compaction::{CompactionError, ConversationCompactor};
use crate::config::MemchatConfig;
use crate::llm::{LLMError, LLMProvider, LLMRequest};
use crate::store::{SessionStore, StoreError};
use crate::summarizer::LlmSummarizer;
use crate::transcript::{SessionId, Transcript, TurnRole};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("model request failed: {0}")]
    Provider(#[from] LLMError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Compaction(#[from] CompactionError),
    #[error("input must not be empty")]
    EmptyInput,
    #[error("model returned an empty reply")]
    EmptyReply,
}

pub struct ChatSession {
    id: SessionId,
    transcript: Transcript,
    provider: Arc<dyn LLMProvider>,
    compactor: ConversationCompactor,
    store: Arc<dyn SessionStore>,
    model: String,
    system_prompt: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl ChatSession {
    /// Start an empty session. Nothing is read from `store`.
    pub fn new(
        id: SessionId,
        provider: Arc<dyn LLMProvider>,
        compactor: ConversationCompactor,
        store: Arc<dyn SessionStore>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id,
            transcript: Transcript::new(),
            provider,
            compactor,
            store,
            model: model.into(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Continue from the stored checkpoint for `id`, or start empty.
    pub fn resume(
        id: SessionId,
        provider: Arc<dyn LLMProvider>,
        compactor: ConversationCompactor,
        store: Arc<dyn SessionStore>,
        model: impl Into<String>,
    ) -> Result<Self, ChatError> {
        let transcript = store.load_or_default(&id)?;
        debug!(session = %id, turns = transcript.len(), "resumed session");
        let mut session = Self::new(id, provider, compactor, store, model);
        session.transcript = transcript;
        Ok(session)
    }

    /// Resume a session wired the way `config` describes: the provider both
    /// answers and summarizes, using `[agent].default_model`.
    pub fn from_config(
        config: &MemchatConfig,
        id: SessionId,
        provider: Arc<dyn LLMProvider>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ChatError> {
        let policy = config.compaction.policy()?;
        let summarizer = LlmSummarizer::new(provider.clone(), config.agent.default_model.clone())
            .with_max_tokens(config.agent.max_tokens);
        let compactor = ConversationCompactor::new(policy, Arc::new(summarizer));

        Ok(Self::resume(
            id,
            provider,
            compactor,
            store,
            config.agent.default_model.clone(),
        )?
        .with_system_prompt(config.agent.system_prompt())
        .with_max_tokens(config.agent.max_tokens)
        .with_temperature(config.agent.temperature))
    }

    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one conversational turn and return the model's reply.
    ///
    /// A compaction failure is not fatal: the turn proceeds with the
    /// uncompacted transcript. If the model call fails, the user's turn stays
    /// in the in-memory transcript but nothing is checkpointed.
    pub async fn send(&mut self, input: &str) -> Result<String, ChatError> {
        if input.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }

        self.transcript.push(TurnRole::User, input);

        match self.compactor.compact(&self.transcript).await {
            Ok(compacted) => self.transcript = compacted,
            Err(err) => warn!(
                session = %self.id,
                turns = self.transcript.len(),
                error = %err,
                "compaction failed, continuing with full transcript"
            ),
        }

        let request = LLMRequest::from_transcript(self.model.clone(), &self.transcript)
            .with_system_prompt(self.system_prompt.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);
        let response = self.provider.generate(request).await?;
        debug!(
            session = %self.id,
            finish_reason = ?response.finish_reason,
            usage = ?response.usage,
            "model replied"
        );

        let reply = response.content.unwrap_or_default();
        if reply.trim().is_empty() {
            return Err(ChatError::EmptyReply);
        }

        self.transcript.push(TurnRole::Assistant, reply.clone());
        self.store.save(&self.id, &self.transcript)?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compaction::CompactionPolicy;
    use crate::llm::{MockFailure, MockProvider, MockStep};
    use crate::store::MemorySessionStore;

    fn session_with(
        provider: &MockProvider,
        store: &Arc<MemorySessionStore>,
        id: &str,
    ) -> ChatSession {
        let provider: Arc<dyn LLMProvider> = Arc::new(provider.clone());
        let summarizer = LlmSummarizer::new(provider.clone(), "mock-echo");
        let compactor =
            ConversationCompactor::new(CompactionPolicy::default(), Arc::new(summarizer));
        ChatSession::resume(
            SessionId::new(id).unwrap(),
            provider,
            compactor,
            store.clone(),
            "mock-echo",
        )
        .unwrap()
    }

    fn seed(store: &MemorySessionStore, id: &str, turns: usize) {
        let mut transcript = Transcript::new();
        for i in 1..=turns {
            let role = if i % 2 == 1 {
                TurnRole::User
            } else {
                TurnRole::Assistant
            };
            transcript.push(role, format!("t{i}"));
        }
        store
            .save(&SessionId::new(id).unwrap(), &transcript)
            .unwrap();
    }

    #[tokio::test]
    async fn reply_is_appended_and_checkpointed() {
        let provider = MockProvider::from_steps(vec![MockStep::text("Paris.")]);
        let store = Arc::new(MemorySessionStore::new());
        let mut session = session_with(&provider, &store, "1");

        let reply = session.send("Capital of France?").await.unwrap();
        assert_eq!(reply, "Paris.");
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(
            store.load(session.id()).unwrap(),
            session.transcript().clone()
        );
    }

    #[tokio::test]
    async fn long_history_is_compacted_before_the_reply() {
        let provider = MockProvider::from_steps(vec![
            MockStep::text("earlier small talk"),
            MockStep::text("reply"),
        ]);
        let store = Arc::new(MemorySessionStore::new());
        seed(&store, "1", 8);
        let mut session = session_with(&provider, &store, "1");

        session.send("t9").await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].messages[0].content.contains("USER: t7"));
        // head(5) + summary + latest user turn
        assert_eq!(requests[1].messages.len(), 7);

        let turns = session.transcript().turns();
        assert_eq!(turns.len(), 8);
        assert_eq!(turns[5].role(), TurnRole::SystemSummary);
        assert_eq!(
            turns[5].text(),
            "[Summary of earlier conversation]: earlier small talk"
        );
        assert_eq!(turns[6].text(), "t9");
        assert_eq!(turns[7].text(), "reply");
    }

    #[tokio::test]
    async fn summarizer_failure_falls_back_to_full_transcript() {
        let provider = MockProvider::from_steps(vec![
            MockStep::failure(MockFailure::Network),
            MockStep::text("still here"),
        ]);
        let store = Arc::new(MemorySessionStore::new());
        seed(&store, "1", 8);
        let mut session = session_with(&provider, &store, "1");

        let reply = session.send("t9").await.unwrap();
        assert_eq!(reply, "still here");
        assert_eq!(session.transcript().len(), 10);
        assert_eq!(provider.requests()[1].messages.len(), 9);
        assert_eq!(store.load(session.id()).unwrap().len(), 10);
    }

    #[tokio::test]
    async fn provider_error_keeps_user_turn_without_checkpoint() {
        let provider = MockProvider::from_steps(vec![MockStep::failure(MockFailure::RateLimit)]);
        let store = Arc::new(MemorySessionStore::new());
        let mut session = session_with(&provider, &store, "1");

        let err = session.send("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Provider(LLMError::RateLimit)));
        assert_eq!(session.transcript().len(), 1);
        assert!(matches!(
            store.load(session.id()),
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn user_text_is_stored_verbatim() {
        let provider = MockProvider::from_steps(vec![MockStep::text("ok")]);
        let store = Arc::new(MemorySessionStore::new());
        let mut session = session_with(&provider, &store, "1");

        session.send("  indented\n").await.unwrap();
        assert_eq!(session.transcript().turns()[0].text(), "  indented\n");
        assert_eq!(provider.requests()[0].messages[0].content, "  indented\n");
    }

    #[tokio::test]
    async fn blank_input_is_rejected() {
        let provider = MockProvider::new();
        let store = Arc::new(MemorySessionStore::new());
        let mut session = session_with(&provider, &store, "1");

        assert!(matches!(
            session.send("   ").await,
            Err(ChatError::EmptyInput)
        ));
        assert!(session.transcript().is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn from_config_applies_agent_settings() {
        let mut config = MemchatConfig::default();
        config.agent.default_model = "mock-echo".to_string();
        config.agent.system_prompt = "Be brief.".to_string();
        config.agent.temperature = Some(0.3);

        let provider = MockProvider::new();
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let mut session = ChatSession::from_config(
            &config,
            SessionId::new("cfg").unwrap(),
            Arc::new(provider.clone()),
            store,
        )
        .unwrap();

        let reply = session.send("ping").await.unwrap();
        assert_eq!(reply, "mock-echo: ping");

        let request = &provider.requests()[0];
        assert_eq!(request.model, "mock-echo");
        assert_eq!(request.system_prompt.as_deref(), Some("Be brief."));
        assert_eq!(request.temperature, Some(0.3));
    }
}
