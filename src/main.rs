//! memchat - terminal chat with bounded conversation memory

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use memchat_core::config::ConfigManager;
use memchat_core::config::api_keys::load_dotenv;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);
    load_dotenv()?;

    let workspace = match &args.workspace {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("cannot determine current dir")?,
    };

    let command = args.command.clone().unwrap_or_default();
    if let Commands::Init { force } = command {
        return cli::handle_init_command(&workspace, force);
    }

    let mut config = ConfigManager::load_with_override(args.config.as_deref(), &workspace)
        .context("Failed to load configuration")?
        .into_config();
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    match command {
        Commands::Chat { session } => cli::handle_chat_command(&config, session.as_deref()).await,
        Commands::History { session } => cli::handle_history_command(&config, session.as_deref()),
        Commands::Sessions => cli::handle_sessions_command(&config),
        Commands::Init { .. } => Ok(()),
    }
}

/// Logs go to stderr so they never interleave with the chat prompt.
/// `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,memchat=debug,memchat_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
