//! Configuration management for diffscout
//!
//! Supports feature-specific configuration sections:
//! - [api] - AI completion endpoint settings
//! - [review] - token budget and retry settings

use crate::error::{ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: &str = "1";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version for tracking schema changes
    #[serde(default = "default_config_version")]
    pub version: String,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub review: ReviewConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            api: ApiConfig::default(),
            review: ReviewConfig::default(),
        }
    }
}

/// AI completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key; falls back to DIFFSCOUT_API_KEY / GEMINI_API_KEY env vars
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Per-call timeout. LLM latency on large reviews runs to minutes.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Key from config, or from the environment when the file has none.
    pub fn resolve_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("DIFFSCOUT_API_KEY").ok())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }
}

/// Review batching and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Token budget per AI request; batches are closed before exceeding it
    #[serde(default = "default_max_tokens_per_request")]
    pub max_tokens_per_request: usize,

    /// Total attempts for the single-prompt analysis path
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// How many high-severity issues the summary surfaces
    #[serde(default = "default_top_issue_limit")]
    pub top_issue_limit: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_request: default_max_tokens_per_request(),
            max_attempts: default_max_attempts(),
            top_issue_limit: default_top_issue_limit(),
        }
    }
}

fn default_config_version() -> String {
    CURRENT_CONFIG_VERSION.to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        .to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f32 {
    0.95
}

fn default_max_output_tokens() -> u32 {
    8192
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_tokens_per_request() -> usize {
    4096
}

fn default_max_attempts() -> u32 {
    3
}

fn default_top_issue_limit() -> usize {
    3
}

/// Default config file location: `<config dir>/diffscout/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("diffscout").join("config.toml"))
}

impl Config {
    /// Load configuration from an explicit path, or from the default
    /// location. A missing file yields the defaults; a present-but-invalid
    /// file is an error.
    pub fn load(path: Option<&str>) -> ScoutResult<Self> {
        let path = match path {
            Some(explicit) => PathBuf::from(explicit),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path).map_err(|e| {
            ScoutError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| ScoutError::Config(format!("invalid config {}: {}", path.display(), e)))
    }
}
