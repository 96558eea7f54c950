use super::{open_store, resolve_session_id};
use anyhow::{Context, Result};
use chrono::Local;
use console::style;
use memchat_core::config::{MemchatConfig, StoreKind};
use memchat_core::store::StoreError;
use memchat_core::transcript::TurnRole;

/// Handle the history command
pub fn handle_history_command(config: &MemchatConfig, session: Option<&str>) -> Result<()> {
    let session_id = resolve_session_id(session, config)?;
    if config.session.store == StoreKind::Memory {
        println!(
            "{}",
            style("The memory store keeps nothing between runs; use --store file").yellow()
        );
        return Ok(());
    }

    let store = open_store(config)?;
    let checkpoint = match store.load_checkpoint(&session_id) {
        Ok(checkpoint) => checkpoint,
        Err(StoreError::NotFound(_)) => {
            println!("No checkpoint for session {session_id}");
            return Ok(());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to load session {session_id}"));
        }
    };

    println!(
        "{} {}",
        style(format!("Session {}", checkpoint.session_id)).cyan().bold(),
        style(format!(
            "· {} turns · saved {}",
            checkpoint.transcript.len(),
            checkpoint
                .updated_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
        ))
        .dim()
    );

    for turn in checkpoint.transcript.iter() {
        let label = match turn.role() {
            TurnRole::User => style(turn.role().prompt_label()).cyan().bold(),
            TurnRole::Assistant => style(turn.role().prompt_label()).green().bold(),
            TurnRole::SystemSummary => style(turn.role().prompt_label()).yellow().bold(),
        };
        println!(
            "{} {}: {}",
            style(format!("[{}]", turn.sequence())).dim(),
            label,
            turn.text()
        );
    }
    Ok(())
}
