use super::{open_store, resolve_session_id};
use anyhow::{Context, Result};
use console::style;
use memchat_core::config::MemchatConfig;
use memchat_core::config::api_keys::{get_api_key, requires_api_key};
use memchat_core::config::constants::chat;
use memchat_core::llm::create_provider;
use memchat_core::session::ChatSession;
use std::io::{self, Write};
use tracing::warn;

/// Handle the chat command
pub async fn handle_chat_command(config: &MemchatConfig, session: Option<&str>) -> Result<()> {
    let session_id = resolve_session_id(session, config)?;

    let provider_name = config.agent.provider.as_str();
    let api_key = if requires_api_key(provider_name) {
        Some(get_api_key(provider_name, &config.agent.api_key_env)?)
    } else {
        None
    };
    let provider = create_provider(provider_name, config.agent.provider_config(api_key))
        .with_context(|| format!("Failed to initialize provider '{provider_name}'"))?;

    if !provider
        .supported_models()
        .iter()
        .any(|model| model == &config.agent.default_model)
    {
        warn!(
            provider = provider.name(),
            model = %config.agent.default_model,
            "model is not in the provider's known list"
        );
    }

    let store = open_store(config)?;
    let mut session = ChatSession::from_config(config, session_id, provider, store)
        .context("Failed to start chat session")?;

    println!(
        "{} {}",
        style("memchat").cyan().bold(),
        style(format!(
            "session {} · {} · compaction above {} turns",
            session.id(),
            session.model(),
            config.compaction.threshold
        ))
        .dim()
    );
    if !session.transcript().is_empty() {
        println!(
            "{}",
            style(format!(
                "Resumed {} turns from the last checkpoint",
                session.transcript().len()
            ))
            .dim()
        );
    }
    println!();

    let stdin = io::stdin();
    loop {
        print!("{}", chat::INPUT_PROMPT);
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            // EOF
            println!();
            println!("{}", chat::EXIT_MESSAGE);
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if chat::EXIT_COMMANDS
            .iter()
            .any(|command| input.eq_ignore_ascii_case(command))
        {
            println!("{}", chat::EXIT_MESSAGE);
            break;
        }

        match session.send(input).await {
            Ok(reply) => println!("{} {}\n", style(chat::REPLY_PREFIX).green().bold(), reply),
            Err(err) => eprintln!("{} {err}", style("Error:").red().bold()),
        }
    }

    println!(
        "{}",
        style(format!(
            "Session {} holds {} turns",
            session.id(),
            session.transcript().len()
        ))
        .dim()
    );
    Ok(())
}
