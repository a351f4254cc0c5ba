//! Configuration types for the route composer

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::PLACEHOLDER_SYMBOL;
use crate::ConfigError;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_PATH_ENV: &str = "ROUTE_COMPOSER_CONFIG";

/// Environment variable overriding the API port.
pub const PORT_ENV: &str = "ROUTE_COMPOSER_PORT";

/// Environment variable overriding the API bind address.
pub const HOST_ENV: &str = "ROUTE_COMPOSER_HOST";

/// Settings for the composition engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Lower clamp for displayed route percentages when several routes exist
    #[serde(default = "default_min_display_percentage")]
    pub min_display_percentage: f64,

    /// Upper clamp for displayed route percentages when several routes exist
    #[serde(default = "default_max_display_percentage")]
    pub max_display_percentage: f64,

    /// Symbol used for tokens the resolver cannot describe
    #[serde(default = "default_placeholder_symbol")]
    pub placeholder_symbol: String,
}

fn default_min_display_percentage() -> f64 {
    0.01
}

fn default_max_display_percentage() -> f64 {
    99.99
}

fn default_placeholder_symbol() -> String {
    PLACEHOLDER_SYMBOL.to_string()
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            min_display_percentage: default_min_display_percentage(),
            max_display_percentage: default_max_display_percentage(),
            placeholder_symbol: default_placeholder_symbol(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// API bind address
    #[serde(default = "default_api_host")]
    pub api_host: IpAddr,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Browser origins allowed by CORS; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Engine settings
    #[serde(default)]
    pub compose: ComposeConfig,
}

fn default_api_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_api_port() -> u16 {
    19054
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_host: default_api_host(),
            api_port: default_api_port(),
            allowed_origins: Vec::new(),
            compose: ComposeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON config document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&contents)
    }

    /// Load config from the file named by `ROUTE_COMPOSER_CONFIG` (if set),
    /// then apply the `ROUTE_COMPOSER_HOST` and `ROUTE_COMPOSER_PORT` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };

        if let Ok(host) = std::env::var(HOST_ENV) {
            config.api_host = host.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "api_host",
                reason: format!("{} is not an IP address", host),
            })?;
        }

        if let Ok(port) = std::env::var(PORT_ENV) {
            config.api_port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "api_port",
                reason: format!("{} is not a valid port", port),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api_port",
                reason: "port must be non-zero".to_string(),
            });
        }

        if let Some(origin) = self
            .allowed_origins
            .iter()
            .find(|o| !(o.starts_with("http://") || o.starts_with("https://")))
        {
            return Err(ConfigError::InvalidValue {
                field: "allowed_origins",
                reason: format!("{} is not an http(s) origin", origin),
            });
        }

        let min = self.compose.min_display_percentage;
        let max = self.compose.max_display_percentage;
        if !(0.0..=100.0).contains(&min) || !(0.0..=100.0).contains(&max) {
            return Err(ConfigError::InvalidValue {
                field: "compose.display_percentage",
                reason: format!("bounds must lie within 0..=100, got {}..={}", min, max),
            });
        }
        if min > max {
            return Err(ConfigError::InvalidValue {
                field: "compose.display_percentage",
                reason: format!("lower bound {} exceeds upper bound {}", min, max),
            });
        }

        Ok(())
    }
}
