use crate::config::constants::paths;
use crate::config::core::{AgentConfig, CompactionConfig, SessionConfig};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure, one field per `memchat.toml` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MemchatConfig {
    /// Provider and model settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Transcript compaction policy
    #[serde(default)]
    pub compaction: CompactionConfig,

    /// Checkpoint store settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl MemchatConfig {
    /// Reject settings the chat loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.compaction
            .policy()
            .context("Invalid [compaction] section")?;
        ensure!(
            !self.agent.default_model.trim().is_empty(),
            "[agent].default_model must not be empty"
        );
        ensure!(
            !self.session.default_id.trim().is_empty(),
            "[session].default_id must not be empty"
        );
        Ok(())
    }

    /// Write a default `memchat.toml` into `workspace`.
    ///
    /// Returns the names of files created; an existing file is left alone
    /// unless `force` is set.
    pub fn bootstrap_project<P: AsRef<Path>>(workspace: P, force: bool) -> Result<Vec<String>> {
        let workspace = workspace.as_ref();
        let mut created_files = Vec::new();

        let config_path = workspace.join(paths::CONFIG_FILE_NAME);
        if !config_path.exists() || force {
            Self::create_sample_config(&config_path)?;
            created_files.push(paths::CONFIG_FILE_NAME.to_string());
        }

        Ok(created_files)
    }

    /// Create sample configuration file
    pub fn create_sample_config<P: AsRef<Path>>(output: P) -> Result<()> {
        let output = output.as_ref();
        let config_content = toml::to_string_pretty(&MemchatConfig::default())
            .context("Failed to serialize default configuration")?;

        fs::write(output, config_content)
            .with_context(|| format!("Failed to write config file: {}", output.display()))?;

        Ok(())
    }
}

/// Configuration manager for loading and validating configurations
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: MemchatConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        Self::load_from_workspace(std::env::current_dir()?)
    }

    /// Load an explicit file when given, otherwise search from `workspace`.
    pub fn load_with_override(
        explicit: Option<&Path>,
        workspace: impl AsRef<Path>,
    ) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => Self::load_from_workspace(workspace),
        }
    }

    /// Load configuration from a specific workspace
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        let workspace = workspace.as_ref();

        // Try memchat.toml in workspace root first
        let config_path = workspace.join(paths::CONFIG_FILE_NAME);
        if config_path.exists() {
            return Self::load_from_file(&config_path);
        }

        // Then ~/.memchat/memchat.toml
        if let Some(home_dir) = dirs::home_dir() {
            let home_config_path = home_dir.join(paths::DOT_DIR).join(paths::CONFIG_FILE_NAME);
            if home_config_path.exists() {
                return Self::load_from_file(&home_config_path);
            }
        }

        debug!(workspace = %workspace.display(), "no config file found, using defaults");
        Ok(Self {
            config: MemchatConfig::default(),
            config_path: None,
        })
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: MemchatConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        debug!(path = %path.display(), "loaded configuration");
        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &MemchatConfig {
        &self.config
    }

    /// Take ownership of the configuration, e.g. to apply CLI overrides
    pub fn into_config(self) -> MemchatConfig {
        self.config
    }

    /// Get the configuration file path (if loaded from file)
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::core::StoreKind;

    #[test]
    fn empty_file_yields_defaults() {
        let config: MemchatConfig = toml::from_str("").unwrap();
        assert_eq!(config, MemchatConfig::default());
        assert_eq!(config.agent.provider, "gemini");
        assert_eq!(config.agent.default_model, "gemini-2.0-flash");
        assert_eq!(config.compaction.threshold, 8);
        assert_eq!(config.compaction.preserve_head, 5);
        assert_eq!(config.session.store, StoreKind::File);
        assert_eq!(config.session.default_id, "default");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: MemchatConfig = toml::from_str(
            r#"
            [agent]
            provider = "mock"
            temperature = 0.2

            [compaction]
            threshold = 12

            [session]
            store = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.agent.provider, "mock");
        assert_eq!(config.agent.temperature, Some(0.2));
        assert_eq!(config.agent.request_timeout_secs, 60);
        assert_eq!(config.compaction.threshold, 12);
        assert_eq!(config.compaction.preserve_head, 5);
        assert_eq!(config.session.store, StoreKind::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_policy_fails_to_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("memchat.toml");
        fs::write(&path, "[compaction]\nthreshold = 4\npreserve_head = 4\n").unwrap();

        let err = ConfigManager::load_from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("preserve_head"));
    }

    #[test]
    fn workspace_file_is_preferred() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join("memchat.toml"),
            "[agent]\ndefault_model = \"gemini-2.5-flash\"\n",
        )
        .unwrap();

        let manager = ConfigManager::load_from_workspace(temp_dir.path()).unwrap();
        assert_eq!(manager.config().agent.default_model, "gemini-2.5-flash");
        assert_eq!(
            manager.config_path(),
            Some(temp_dir.path().join("memchat.toml").as_path())
        );
    }

    #[test]
    fn bootstrap_writes_a_loadable_default_config() {
        let temp_dir = tempfile::tempdir().unwrap();

        let created = MemchatConfig::bootstrap_project(temp_dir.path(), false).unwrap();
        assert_eq!(created, vec!["memchat.toml".to_string()]);
        assert!(
            MemchatConfig::bootstrap_project(temp_dir.path(), false)
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            MemchatConfig::bootstrap_project(temp_dir.path(), true).unwrap(),
            vec!["memchat.toml".to_string()]
        );

        let manager = ConfigManager::load_from_file(temp_dir.path().join("memchat.toml")).unwrap();
        assert_eq!(manager.config(), &MemchatConfig::default());
    }
}
