//! # memchat-core - bounded-memory chat runtime
//!
//! `memchat-core` keeps a chat transcript small enough to send to a model on
//! every turn without forgetting how the conversation started.
//!
//! ## Highlights
//!
//! - **Compaction**: once a transcript exceeds its threshold, the first few
//!   turns are kept verbatim, the middle is replaced by one model-written
//!   summary turn, and the latest turn is always kept as is.
//! - **Provider Abstraction**: a small [`llm::LLMProvider`] trait with a
//!   Gemini adapter and a scripted mock for offline runs.
//! - **Checkpoints**: every completed turn is saved per session id, in memory
//!   or as JSON files, so a chat can resume after a restart.
//! - **Configuration-First**: defaults live in `config::constants` and are
//!   overridden by `memchat.toml`.
//!
//! ## Quickstart
//!
//! ```rust,no_run
//! use memchat_core::config::ConfigManager;
//! use memchat_core::llm::create_provider;
//! use memchat_core::store::MemorySessionStore;
//! use memchat_core::{ChatSession, SessionId};
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ConfigManager::load()?.into_config();
//! let provider = create_provider("mock", config.agent.provider_config(None))?;
//! let mut session = ChatSession::from_config(
//!     &config,
//!     SessionId::new("1")?,
//!     provider,
//!     Arc::new(MemorySessionStore::new()),
//! )?;
//!
//! let reply = session.send("Hello!").await?;
//! println!("AI: {reply}");
//! # Ok(())
//! # }
//! ```

pub mod compaction;
pub mod config;
pub mod llm;
pub mod session;
pub mod store;
pub mod summarizer;
pub mod transcript;

pub use compaction::{
    CompactionError, CompactionPlan, CompactionPolicy, ConversationCompactor, compact,
};
pub use config::{ConfigManager, MemchatConfig};
pub use session::{ChatError, ChatSession};
pub use store::{
    Checkpoint, FileSessionStore, MemorySessionStore, SessionListing, SessionStore, StoreError,
};
pub use summarizer::{LlmSummarizer, SummarizationError, Summarizer};
pub use transcript::{SessionId, Transcript, TranscriptError, Turn, TurnRole};
