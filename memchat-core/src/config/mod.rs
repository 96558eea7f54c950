//! Configuration Module
//!
//! Loads `memchat.toml`, exposes the compiled-in defaults and resolves API
//! keys from the environment.

pub mod api_keys;
pub mod constants;
pub mod core;
pub mod loader;

pub use core::{AgentConfig, CompactionConfig, SessionConfig, StoreKind};
pub use loader::{ConfigManager, MemchatConfig};
