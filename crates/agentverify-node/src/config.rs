//! Service configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full configuration for the AgentVerify service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentVerifyConfig {
    /// API server settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// External platform settings.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Background maintenance settings.
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listen address.
    #[serde(default = "default_api_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform API.
    #[serde(default = "default_platform_base_url")]
    pub base_url: String,
    /// Platform label used in profiles and DIDs.
    #[serde(default = "default_platform_name")]
    pub name: String,
    /// Optional bearer credential for the platform API.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_platform_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceConfig {
    /// Whether the expired-challenge sweep runs. The sweep reclaims
    /// memory only; expiry itself is evaluated at read time.
    #[serde(default = "default_true")]
    pub challenge_sweep: bool,
    /// Sweep interval in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

// Default value functions
fn default_api_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    3000
}
fn default_platform_base_url() -> String {
    "https://www.moltbook.com/api/v1".into()
}
fn default_platform_name() -> String {
    "moltbook".into()
}
fn default_platform_timeout_secs() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}
fn default_true() -> bool {
    true
}
fn default_sweep_interval_secs() -> u64 {
    300
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_api_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: default_platform_base_url(),
            name: default_platform_name(),
            api_key: None,
            timeout_secs: default_platform_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            challenge_sweep: true,
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl AgentVerifyConfig {
    /// Load config from a TOML file, falling back to defaults for missing
    /// fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: AgentVerifyConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}
