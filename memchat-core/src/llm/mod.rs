//! # LLM Integration Layer
//!
//! A small provider abstraction used by the chat session and the summarizer.
//!
//! | Provider | Models |
//! |----------|--------|
//! | Gemini | gemini-2.0-flash, gemini-2.5-flash, gemini-2.5-pro |
//! | Mock | offline echo, scripted replies for tests |
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use memchat_core::llm::{LLMRequest, Message, ProviderConfig, create_provider};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = create_provider(
//!     "gemini",
//!     ProviderConfig {
//!         api_key: Some(std::env::var("GEMINI_API_KEY")?),
//!         ..Default::default()
//!     },
//! )?;
//!
//! let request = LLMRequest::new(
//!     "gemini-2.0-flash",
//!     vec![Message::user("Hello!".to_string())],
//! );
//! let response = provider.generate(request).await?;
//! println!("{}", response.content.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod factory;
pub mod provider;
pub mod providers;

pub use factory::{ProviderConfig, create_provider};
pub use provider::{
    FinishReason, LLMError, LLMProvider, LLMRequest, LLMResponse, Message, MessageRole, Usage,
};
pub use providers::{GeminiProvider, MockFailure, MockProvider, MockStep};
