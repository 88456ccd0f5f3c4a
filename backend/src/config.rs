//! Application configuration.
//!
//! Settings are read from `rank-insight.toml` when one is found, then
//! overridden from the environment. Every field has a default, so an empty
//! file (or no file) yields a runnable configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::db::SessionLimits;

pub const CONFIG_FILE_NAME: &str = "rank-insight.toml";

/// API key value shipped in example env files; treated as unset.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("No rank-insight.toml found in standard locations")]
    NotFound,

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub llm: LlmSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,
    /// Sessions kept in memory at once; 0 for no limit
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Minutes an untouched session is kept; 0 keeps sessions forever
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: u64,
}

/// Language-model collaborator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit_mb() -> usize {
    50
}

fn default_max_sessions() -> usize {
    500
}

fn default_session_ttl_minutes() -> u64 {
    24 * 60
}

fn default_model() -> String {
    "claude-opus-4-5-20251101".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_mb: default_body_limit_mb(),
            max_sessions: default_max_sessions(),
            session_ttl_minutes: default_session_ttl_minutes(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
            api_version: default_api_version(),
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(1024 * 1024)
    }

    pub fn session_limits(&self) -> SessionLimits {
        let ttl_minutes = i64::try_from(self.session_ttl_minutes).unwrap_or(i64::MAX);
        let ttl = Duration::try_minutes(ttl_minutes).unwrap_or(Duration::MAX);
        SessionLimits {
            max_sessions: (self.max_sessions > 0).then_some(self.max_sessions),
            ttl: (ttl_minutes > 0).then_some(ttl),
        }
    }
}

impl LlmSettings {
    /// The configured key, unless it is empty or the placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    pub fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `rank-insight.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Config file if one is found, defaults otherwise, then environment
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match Self::from_default_location() {
            Ok(config) => config,
            Err(ConfigError::NotFound) => {
                info!("No {} found, using defaults", CONFIG_FILE_NAME);
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env()
    }

    /// Override settings from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override settings from `lookup`. Recognised keys: `HOST`, `PORT`,
    /// `ANTHROPIC_API_KEY`, `ANTHROPIC_MODEL`, `ANTHROPIC_BASE_URL`.
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(key) = lookup("ANTHROPIC_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = lookup("ANTHROPIC_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = lookup("ANTHROPIC_BASE_URL") {
            self.llm.base_url = url;
        }
        if self.llm.usable_api_key().is_none() {
            warn!("ANTHROPIC_API_KEY is not set; AI analysis endpoints will fail");
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.server.body_limit_bytes(), 50 * 1024 * 1024);
        assert_eq!(
            config.server.session_limits(),
            SessionLimits {
                max_sessions: Some(500),
                ttl: Some(Duration::minutes(24 * 60)),
            }
        );
        assert_eq!(config.llm.model, "claude-opus-4-5-20251101");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.llm.messages_url(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
[server]
port = 9000

[llm]
api_key = "sk-test"
max_tokens = 1024
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.usable_api_key(), Some("sk-test"));
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.llm.api_version, "2023-06-01");
    }

    #[test]
    fn test_zero_session_limits_disable_eviction() {
        let toml = r#"
[server]
max_sessions = 0
session_ttl_minutes = 0
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.session_limits(), SessionLimits::default());
    }

    #[test]
    fn test_placeholder_key_is_unusable() {
        let mut llm = LlmSettings::default();
        assert_eq!(llm.usable_api_key(), None);
        llm.api_key = Some(PLACEHOLDER_API_KEY.to_string());
        assert_eq!(llm.usable_api_key(), None);
        llm.api_key = Some("   ".to_string());
        assert_eq!(llm.usable_api_key(), None);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("HOST", "127.0.0.1"),
            ("PORT", "3001"),
            ("ANTHROPIC_API_KEY", "sk-env"),
            ("ANTHROPIC_BASE_URL", "http://localhost:9999/"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::default()
            .apply_env_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.bind_address(), "127.0.0.1:3001");
        assert_eq!(config.llm.usable_api_key(), Some("sk-env"));
        assert_eq!(config.llm.messages_url(), "http://localhost:9999/v1/messages");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = AppConfig::default()
            .apply_env_from(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }
}
