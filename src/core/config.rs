//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.helmsman/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::channel::ReconnectPolicy;
use crate::channel::backoff::{DEFAULT_INITIAL_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HelmsmanConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    pub author: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ReconnectConfig {
    pub initial_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
    /// 0 = retry forever
    pub max_attempts: Option<u32>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8083";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    pub author: String,
    pub chat_enabled: bool,
    pub reconnect: ReconnectPolicy,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.helmsman/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".helmsman").join("config.toml"))
}

/// Load config from `~/.helmsman/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `HelmsmanConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<HelmsmanConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(HelmsmanConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(HelmsmanConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: HelmsmanConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: server={:?}, chat={:?}, reconnect={:?}", config.server.base_url, config.chat, config.reconnect);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Helmsman Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# base_url = "http://localhost:8083"   # Or HELMSMAN_BASE_URL / --server
# username = "owner"                   # Or HELMSMAN_USERNAME
# password = "secret"                  # Or HELMSMAN_PASSWORD

# [chat]
# author = "owner"                     # Or HELMSMAN_AUTHOR / --author
# enabled = true

# [reconnect]
# initial_delay_ms = 500
# max_delay_ms = 30000
# max_attempts = 20                    # 0 = retry forever
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_server` and `cli_author` are from CLI flags (None = not specified).
pub fn resolve(
    config: &HelmsmanConfig,
    cli_server: Option<&str>,
    cli_author: Option<&str>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_server
        .map(|s| s.to_string())
        .or_else(|| std::env::var("HELMSMAN_BASE_URL").ok())
        .or_else(|| config.server.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Credentials: env → config, both halves required
    let username = std::env::var("HELMSMAN_USERNAME")
        .ok()
        .or_else(|| config.server.username.clone());
    let password = std::env::var("HELMSMAN_PASSWORD")
        .ok()
        .or_else(|| config.server.password.clone());
    let credentials = match (username.clone(), password) {
        (Some(username), Some(password)) => Some(Credentials { username, password }),
        _ => None,
    };

    // Author: CLI → env → config → login name → empty (must /name)
    let author = cli_author
        .map(|s| s.to_string())
        .or_else(|| std::env::var("HELMSMAN_AUTHOR").ok())
        .or_else(|| config.chat.author.clone())
        .or(username)
        .unwrap_or_default();

    let reconnect = ReconnectPolicy {
        initial_delay: config
            .reconnect
            .initial_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_INITIAL_DELAY),
        max_delay: config
            .reconnect
            .max_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_MAX_DELAY),
        max_attempts: config
            .reconnect
            .max_attempts
            .unwrap_or(DEFAULT_MAX_ATTEMPTS),
    };

    ResolvedConfig {
        base_url,
        credentials,
        author,
        chat_enabled: config.chat.enabled.unwrap_or(true),
        reconnect,
    }
}
