//! Configuration management for streamwhere
//!
//! Handles config file loading and API key resolution.
//! Config is stored at ~/.config/streamwhere/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// TMDB API key (read access token)
    pub tmdb_api_key: Option<String>,
    /// Default country for availability lookups (ISO 3166-1 code)
    pub default_country: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/streamwhere/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("streamwhere").join("config.toml"))
    }

    /// Load config from the override path or the default location,
    /// falling back to defaults if the file is missing or malformed
    pub fn load(override_path: Option<&Path>) -> Self {
        override_path
            .map(Path::to_path_buf)
            .or_else(Self::path)
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Get TMDB API key with fallback chain:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Key from config file
    pub fn tmdb_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            if !key.is_empty() {
                return Ok(key);
            }
        }

        if let Some(ref key) = self.tmdb_api_key {
            return Ok(key.clone());
        }

        let hint = Self::path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "the config file".to_string());
        Err(anyhow::anyhow!(
            "No TMDB API key found. Set the TMDB_API_KEY environment variable or add tmdb_api_key to {}",
            hint
        ))
    }
}
