use anyhow::{Context, Result};
use console::style;
use memchat_core::config::MemchatConfig;
use std::path::Path;

/// Handle the init command
pub fn handle_init_command(workspace: &Path, force: bool) -> Result<()> {
    println!("{}", style("Initialize memchat configuration").blue().bold());
    println!("Workspace: {}", workspace.display());

    let created = MemchatConfig::bootstrap_project(workspace, force)
        .context("failed to initialize configuration files")?;

    if created.is_empty() {
        println!(
            "{}",
            style("memchat.toml already exists; pass --force to overwrite").yellow()
        );
    } else {
        for file in created {
            println!("{} {}", style("Created").green(), file);
        }
    }
    Ok(())
}
