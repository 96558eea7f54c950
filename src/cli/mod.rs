//! Command-line interface module
//!
//! Argument parsing lives in [`args`]; each subcommand has its own handler.

pub mod args;
pub mod chat;
pub mod history;
pub mod init;
pub mod sessions;

pub use args::{Cli, Commands};
pub use chat::handle_chat_command;
pub use history::handle_history_command;
pub use init::handle_init_command;
pub use sessions::handle_sessions_command;

use anyhow::{Context, Result};
use memchat_core::config::{MemchatConfig, StoreKind};
use memchat_core::store::{FileSessionStore, MemorySessionStore, SessionStore};
use memchat_core::transcript::SessionId;
use std::sync::Arc;

/// Open the checkpoint store selected by `[session].store`.
pub(crate) fn open_store(config: &MemchatConfig) -> Result<Arc<dyn SessionStore>> {
    match config.session.store {
        StoreKind::File => {
            let store = FileSessionStore::open(config.session.dir.as_deref())
                .context("Failed to open session directory")?;
            Ok(Arc::new(store))
        }
        StoreKind::Memory => Ok(Arc::new(MemorySessionStore::new())),
    }
}

/// The requested session id, or `[session].default_id`.
pub(crate) fn resolve_session_id(
    requested: Option<&str>,
    config: &MemchatConfig,
) -> Result<SessionId> {
    let raw = requested.unwrap_or(&config.session.default_id);
    SessionId::new(raw).with_context(|| format!("Invalid session id: {raw:?}"))
}
