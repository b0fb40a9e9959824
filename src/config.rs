use crate::error::TokenCheckError;
use crate::provider::DEFAULT_API_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration for token-check.
///
/// Configuration is stored at `~/.config/token-check/config.json` and created with
/// default values on first run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub github_token_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            github_token_path: home.join(".github").join("token"),
        }
    }
}

impl Config {
    /// Loads configuration from disk, creating a default config file if none exists.
    pub fn load() -> Result<Self, TokenCheckError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self, TokenCheckError> {
        if !config_path.exists() {
            let config = Config::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| TokenCheckError::ConfigLoad { source: e })?;

        serde_json::from_str(&contents).map_err(|e| TokenCheckError::ConfigParse { source: e })
    }

    /// Persists the configuration to `config_path`, creating parent directories.
    pub fn save_to(&self, config_path: &Path) -> Result<(), TokenCheckError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TokenCheckError::ConfigSave { source: e })?;
        }

        let contents =
            serde_json::to_string_pretty(self).map_err(|e| TokenCheckError::ConfigSave {
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            })?;

        std::fs::write(config_path, contents)
            .map_err(|e| TokenCheckError::ConfigSave { source: e })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".config")
            })
            .join("token-check")
            .join("config.json")
    }

    /// Reads the GitHub token from the configured `github_token_path`, if present.
    pub fn read_token(&self) -> Option<String> {
        std::fs::read_to_string(&self.github_token_path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
