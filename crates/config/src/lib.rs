//! Configuration loading, validation, and management for Avatarline.
//!
//! Loads configuration from `~/.avatarline/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.avatarline/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Supervisor model and delegation loop settings
    #[serde(default)]
    pub supervisor: SupervisorConfig,

    /// Streaming avatar vendor settings
    #[serde(default)]
    pub avatar: AvatarConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Knowledge base fixtures
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Front agent persona
    #[serde(default)]
    pub front: FrontConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the Responses-compatible endpoint
    #[serde(default = "default_supervisor_url")]
    pub api_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum supervisor round-trips per delegation
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Per round-trip timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_supervisor_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4.1".into()
}
fn default_max_rounds() -> u32 {
    8
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_supervisor_url(),
            model: default_model(),
            max_rounds: default_max_rounds(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for SupervisorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupervisorConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_rounds", &self.max_rounds)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_avatar_url")]
    pub base_url: String,
}

fn default_avatar_url() -> String {
    "https://api.heygen.com".into()
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_avatar_url(),
        }
    }
}

impl std::fmt::Debug for AvatarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Browser origin allowed by CORS (the avatar UI)
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    /// Requests per minute per client
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: usize,
}

fn default_port() -> u16 {
    8787
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_allowed_origin() -> String {
    "http://localhost:3000".into()
}
fn default_rate_limit() -> usize {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origin: default_allowed_origin(),
            rate_limit_per_minute: default_rate_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// JSON file replacing the built-in fixtures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixtures_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "avatarline_agent=debug,info")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontConfig {
    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    #[serde(default = "default_company_name")]
    pub company_name: String,
}

fn default_agent_name() -> String {
    "Mario".into()
}
fn default_company_name() -> String {
    "Cocoa AI".into()
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            company_name: default_company_name(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.avatarline/config.toml).
    ///
    /// Environment variables override the file:
    /// - `AVATARLINE_API_KEY`, then `OPENAI_API_KEY`: supervisor key
    /// - `AVATARLINE_MODEL`: supervisor model
    /// - `HEYGEN_API_KEY`: avatar vendor key
    /// - `HEYGEN_BASE_URL`: avatar vendor base URL
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (usually `std::env::var`).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.supervisor.api_key.is_none() {
            self.supervisor.api_key =
                lookup("AVATARLINE_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }
        if let Some(model) = lookup("AVATARLINE_MODEL") {
            self.supervisor.model = model;
        }
        if self.avatar.api_key.is_none() {
            self.avatar.api_key = lookup("HEYGEN_API_KEY");
        }
        if let Some(url) = lookup("HEYGEN_BASE_URL") {
            self.avatar.base_url = url;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".avatarline")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.supervisor.max_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "supervisor.max_rounds must be at least 1".into(),
            ));
        }

        if self.supervisor.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "supervisor.timeout_secs must be at least 1".into(),
            ));
        }

        if self.gateway.rate_limit_per_minute == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.rate_limit_per_minute must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if a supervisor API key is available.
    pub fn has_supervisor_key(&self) -> bool {
        self.supervisor.api_key.is_some()
    }

    /// Check if an avatar vendor API key is available.
    pub fn has_avatar_key(&self) -> bool {
        self.avatar.api_key.is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
