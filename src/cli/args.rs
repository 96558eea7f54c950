//! CLI argument parsing and configuration overrides

use clap::{ColorChoice, Parser, Subcommand, ValueHint};
use memchat_core::config::{MemchatConfig, StoreKind};
use std::path::PathBuf;

/// Main CLI structure for memchat
#[derive(Parser, Debug)]
#[command(
    name = "memchat",
    version,
    about = "Terminal chat with bounded conversation memory\n\nLong conversations are compacted: the opening turns are kept, the middle is summarized by the model, and the latest turn is always sent verbatim.\n\nQuick Start:\n  export GEMINI_API_KEY=\"your_key\"\n  memchat chat --session 1",
    color = ColorChoice::Auto
)]
pub struct Cli {
    /// Workspace root used to find `memchat.toml`; defaults to the current directory
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub workspace: Option<PathBuf>,

    /// Explicit configuration file, skipping the workspace and home lookup
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Model ID, e.g. gemini-2.0-flash
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// LLM provider (gemini, mock)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Environment variable to read the API key from
    #[arg(long, global = true, value_name = "VAR")]
    pub api_key_env: Option<String>,

    /// Compact once the transcript holds more than this many turns
    #[arg(long, global = true)]
    pub threshold: Option<usize>,

    /// Leading turns kept verbatim during compaction
    #[arg(long, global = true)]
    pub preserve_head: Option<usize>,

    /// Checkpoint store (file, memory)
    #[arg(long, global = true)]
    pub store: Option<StoreKind>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Interactive chat; type `exit` or `1` to quit
    Chat {
        /// Session to resume or create
        #[arg(long)]
        session: Option<String>,
    },

    /// Print the checkpointed transcript of a session
    History {
        #[arg(long)]
        session: Option<String>,
    },

    /// List stored sessions, most recent first
    Sessions,

    /// Write a default memchat.toml into the workspace
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Chat { session: None }
    }
}

impl Cli {
    /// Apply command-line flags on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut MemchatConfig) {
        if let Some(model) = &self.model {
            config.agent.default_model = model.clone();
        }
        if let Some(provider) = &self.provider {
            config.agent.provider = provider.clone();
        }
        if let Some(api_key_env) = &self.api_key_env {
            config.agent.api_key_env = api_key_env.clone();
        }
        if let Some(threshold) = self.threshold {
            config.compaction.threshold = threshold;
        }
        if let Some(preserve_head) = self.preserve_head {
            config.compaction.preserve_head = preserve_head;
        }
        if let Some(store) = self.store {
            config.session.store = store;
        }
    }
}
