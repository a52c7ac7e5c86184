//! Configuration management for scribe
//!
//! Settings live in an optional `.scribe/config.toml` in the working
//! directory. Every field has a default, so a missing file or a partial one
//! is fine. Command-line flags override what is loaded here.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Result, ScribeError};

/// Base URL of the Gemini model API
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Top-level scribe configuration
///
/// Loaded from `.scribe/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScribeConfig {
    /// Model selection and credentials
    #[serde(default)]
    pub model: ModelConfig,

    /// File mutation settings
    #[serde(default)]
    pub files: FilesConfig,

    /// Log summarizer defaults
    #[serde(default)]
    pub tail: TailConfig,
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Gemini model name
    #[serde(default = "default_model")]
    pub name: String,

    /// Full generateContent URL, overriding the one derived from `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// How backup files are named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupNaming {
    /// `<name>.bak`, skipped with a warning when it already exists
    Fixed,
    /// `<name>.<timestamp>.bak`
    #[default]
    Timestamped,
}

/// File mutation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Maximum number of regular files a directory run may touch
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Backup naming strategy
    #[serde(default)]
    pub backup: BackupNaming,
}

/// Log summarizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailConfig {
    /// Seconds between summaries
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Persona the summary is written as
    #[serde(default = "default_persona")]
    pub persona: String,
}

// Default value providers
fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_max_files() -> usize {
    10
}

fn default_interval_secs() -> u64 {
    5
}

fn default_persona() -> String {
    "a concise systems analyst".to_string()
}

impl ScribeConfig {
    /// Load configuration from `.scribe/config.toml` or use defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(".scribe/config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| {
                ScribeError::Config(format!(
                    "Failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `.scribe/config.toml`
    pub fn write_default(root: &Path) -> Result<()> {
        let config_dir = root.join(".scribe");
        std::fs::create_dir_all(&config_dir)?;

        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| ScribeError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(config_dir.join("config.toml"), content)?;
        Ok(())
    }
}

impl ModelConfig {
    /// The generateContent URL requests are posted to
    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(url) => url.clone(),
            None => format!("{}/{}:generateContent", GEMINI_API_BASE, self.name),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            endpoint: None,
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            backup: BackupNaming::default(),
        }
    }
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            persona: default_persona(),
        }
    }
}
