//! Configuration Management
//!
//! Persistent configuration for the CLI: site URL and API keys.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Site origin, e.g. https://demo.ghost.io
    #[serde(default)]
    pub site_url: Option<String>,
    /// Content API key
    #[serde(default)]
    pub content_key: Option<String>,
    /// Pre-signed admin token (production setups sign these externally)
    #[serde(default)]
    pub admin_token: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ghost-export").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Effective site URL (CLI flag > config > environment)
    pub fn effective_url(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string)
            .or_else(|| self.site_url.clone())
            .or_else(|| std::env::var("GHOST_URL").ok())
    }

    /// Effective content key (CLI flag > config > environment)
    pub fn effective_content_key(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string)
            .or_else(|| self.content_key.clone())
            .or_else(|| std::env::var("GHOST_CONTENT_API_KEY").ok())
    }

    /// Effective admin token (CLI flag > config > environment)
    pub fn effective_admin_token(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string)
            .or_else(|| self.admin_token.clone())
            .or_else(|| std::env::var("GHOST_ADMIN_TOKEN").ok())
    }
}
