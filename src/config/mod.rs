//! Configuration management for Syncguard
//!
//! A single fixed config file (`~/.config/syncguard/config.toml`) with
//! compiled-in defaults for every field. There is no discovery cascade and no
//! dynamic reload: the rule table ships with the binary, and the config only
//! names the repositories and tunes the push.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::sync::RepositoryTarget;

/// Main configuration structure for Syncguard
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Shared configuration repository; always routed through the secret
    /// scanner before a commit, because it is assumed to have a public remote
    pub config_repo: PathBuf,

    /// Remote pushed to after a successful commit
    pub remote: String,

    /// Upper bound on a single push attempt, in seconds
    pub push_timeout_secs: u64,

    /// Extra glob patterns excluded from the content scan, on top of the
    /// built-in exclusion list
    pub exclude: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            config_repo: default_config_repo(),
            remote: "origin".to_string(),
            push_timeout_secs: 30,
            exclude: Vec::new(),
        }
    }
}

/// Default location of the shared agent configuration repository
fn default_config_repo() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claude")
}

impl SyncConfig {
    /// Load configuration from the fixed path, falling back to compiled-in
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: SyncConfig = toml::from_str(&raw)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        config.config_repo = expand_tilde(&config.config_repo);
        Ok(config)
    }

    /// Fixed config file location
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("syncguard").join("config.toml"))
    }

    /// Build the ordered target list: the workspace first, then the shared
    /// configuration repository. The workspace comes from the CLI flag or the
    /// SYNCGUARD_WORKSPACE environment variable, falling back to the current
    /// directory; only the shared repository is guarded.
    pub fn targets(&self, workspace: Option<PathBuf>) -> Vec<RepositoryTarget> {
        let workspace = workspace
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        vec![
            RepositoryTarget::new(workspace, "workspace", false),
            RepositoryTarget::new(self.config_repo.clone(), "config", true),
        ]
    }
}

/// Expand a leading `~` to the home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
