use super::open_store;
use anyhow::{Context, Result};
use chrono::Local;
use console::style;
use memchat_core::config::MemchatConfig;

/// Handle the sessions command
pub fn handle_sessions_command(config: &MemchatConfig) -> Result<()> {
    let store = open_store(config)?;
    let listings = store.list().context("Failed to list sessions")?;

    if listings.is_empty() {
        println!("No stored sessions");
        return Ok(());
    }

    println!("{}", style("Stored sessions").cyan().bold());
    for listing in listings {
        println!(
            "  {:<24} {:>4} turns  {}",
            listing.session_id.as_str(),
            listing.turns,
            style(
                listing
                    .updated_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
            )
            .dim()
        );
    }
    Ok(())
}
