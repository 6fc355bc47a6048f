//! Configuration file support for themetree
//!
//! Handles `.themetree.toml` configuration file loading and saving.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::ReloadPolicy;

/// Default configuration file name
const CONFIG_FILE_NAME: &str = ".themetree.toml";

/// Environment variable consulted before the config file for the token
pub const TOKEN_ENV_VAR: &str = "THEMETREE_TOKEN";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host base URL, e.g. "http://127.0.0.1:8000"
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Session token sent as X-CSRF-Token (can also be set via THEMETREE_TOKEN)
    #[serde(default)]
    pub token: Option<String>,

    /// Directory for the locally persisted bindings
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Theme to fall back to when the active theme is deleted
    #[serde(default = "default_fallback_theme")]
    pub fallback_theme: String,

    /// How to reconcile the local mirror after a mutation:
    /// "full_rebuild" or "incremental_patch"
    #[serde(default)]
    pub reload_policy: ReloadPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            data_dir: default_data_dir(),
            fallback_theme: default_fallback_theme(),
            reload_policy: ReloadPolicy::default(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".themetree")
}

fn default_fallback_theme() -> String {
    "Azure".to_string()
}

impl Config {
    /// Load configuration file (returns default if not found)
    ///
    /// Searches for `.themetree.toml` in the current directory.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from(CONFIG_FILE_NAME);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from specified path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to specified path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default(path: &Path) -> Result<()> {
        let config = Config::default();
        config.save_to(path)
    }

    /// Resolve the session token: environment variable first, then the
    /// config file. Empty values count as unset.
    pub fn token(&self) -> Option<String> {
        Self::resolve_token(std::env::var(TOKEN_ENV_VAR).ok(), self.token.clone())
    }

    fn resolve_token(env_value: Option<String>, file_value: Option<String>) -> Option<String> {
        env_value
            .filter(|token| !token.is_empty())
            .or(file_value.filter(|token| !token.is_empty()))
    }
}
