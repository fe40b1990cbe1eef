//! Configuration management for sqlexec.
//!
//! Handles loading configuration from TOML files and environment variables:
//! the remote query endpoint, its credentials, and result rendering policy.

use crate::error::{Result, SqlExecError};
use crate::results::DatePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable overriding the endpoint base URL.
pub const ENV_URL: &str = "SQLEXEC_URL";
/// Environment variable overriding the endpoint user.
pub const ENV_USER: &str = "SQLEXEC_USER";
/// Environment variable overriding the endpoint password.
pub const ENV_PASSWORD: &str = "SQLEXEC_PASSWORD";

/// Main configuration structure for sqlexec.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote query service settings.
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Result materialization settings.
    #[serde(default)]
    pub results: ResultsConfig,
}

/// Remote query service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base address; `/consulta` and `/executar` are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Basic-auth user.
    #[serde(default)]
    pub user: Option<String>,

    /// Basic-auth password (not recommended to store in config).
    #[serde(default)]
    pub password: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EndpointConfig {
    /// Validates the base URL and returns it without a trailing slash.
    pub fn validated_base_url(&self) -> Result<String> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| SqlExecError::config(format!("Invalid endpoint URL: {e}")))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SqlExecError::config(format!(
                "Invalid scheme '{}'. Expected 'http' or 'https'",
                url.scheme()
            )));
        }

        Ok(self.base_url.trim_end_matches('/').to_string())
    }

    /// Applies environment variables (SQLEXEC_URL, etc.) over file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_URL) {
            self.base_url = url;
        }
        if let Ok(user) = std::env::var(ENV_USER) {
            self.user = Some(user);
        }
        if let Ok(password) = std::env::var(ENV_PASSWORD) {
            self.password = Some(password);
        }
    }

    /// Returns a display-safe string (no password) for UI purposes.
    pub fn display_string(&self) -> String {
        match &self.user {
            Some(user) => format!("{user} @ {}", self.base_url),
            None => self.base_url.clone(),
        }
    }
}

/// Result rendering configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsConfig {
    /// What to do with a "GMT" value that fails to parse.
    #[serde(default)]
    pub date_policy: DatePolicy,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sqlexec")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SqlExecError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Loads the file, then layers `.env` and process environment on top.
    pub fn load(path: &Path) -> Result<Self> {
        // A missing .env is the common case.
        let _ = dotenvy::dotenv();

        let mut config = Self::load_from_file(path)?;
        config.endpoint.apply_env_overrides();
        config.endpoint.validated_base_url()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            SqlExecError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
