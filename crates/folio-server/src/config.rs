//! Relay settings and TOML configuration parsing.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use folio_core::config::GenerationConfig;

/// Top-level relay configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Listen address settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream generation API settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Sampling parameters forwarded to the generation API.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Request validation limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Per-client rate limiting.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Listen address settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (e.g. `"127.0.0.1"` or `"0.0.0.0"`).
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream generation API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Model identifier passed in the request path.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the generation API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Upper bound on one upstream exchange, streamed body included.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Request validation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Longest accepted message, counted in characters.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
    /// Most recent history turns kept when composing the prompt.
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
}

/// Per-client rate limiting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether the limiter gates `/api/chat` at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Requests allowed per client per minute.
    #[serde(default = "default_per_minute")]
    pub per_minute: u32,
    /// Requests allowed per client per day.
    #[serde(default = "default_per_day")]
    pub per_day: u32,
}

// --- Default value functions ---

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_model() -> String {
    "gemma-3-27b-it".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_message_chars() -> usize {
    300
}

fn default_max_history_turns() -> usize {
    40
}

fn default_true() -> bool {
    true
}

fn default_per_minute() -> u32 {
    20
}

fn default_per_day() -> u32 {
    100
}

// --- Trait impls ---

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gateway: GatewayConfig::default(),
            generation: GenerationConfig::default(),
            limits: LimitsConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
            max_history_turns: default_max_history_turns(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_minute: default_per_minute(),
            per_day: default_per_day(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// If the file does not exist, returns the default configuration.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: RelayConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
