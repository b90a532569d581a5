//! Server configuration.

use serde::{Deserialize, Serialize};

/// Server-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
    /// Log level.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// OTP policy configuration, wired into both the store and the service so
/// the two always agree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpSection {
    /// Challenge TTL in seconds.
    pub expires_in: u64,
    /// Digit length of generated codes.
    pub code_length: u32,
    /// Attempt ceiling.
    pub max_attempts: u32,
    /// Sweep interval in seconds.
    pub sweep_interval: u64,
}

impl Default for OtpSection {
    fn default() -> Self {
        Self {
            expires_in: 600,       // 10 minutes
            code_length: 6,
            max_attempts: 3,
            sweep_interval: 300,   // 5 minutes
        }
    }
}

/// Loads configuration from a TOML file.
pub fn load_config(path: &str) -> Result<(ServerConfig, OtpSection), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    parse_config(&content)
}

/// Parses configuration from TOML text. Missing sections fall back to
/// defaults.
pub fn parse_config(content: &str) -> Result<(ServerConfig, OtpSection), ConfigError> {
    let config: toml::Value =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let server: ServerConfig = config
        .get("server")
        .map(|v| toml::Value::try_into(v.clone()))
        .transpose()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?
        .unwrap_or_default();

    let otp: OtpSection = config
        .get("otp")
        .map(|v| toml::Value::try_into(v.clone()))
        .transpose()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?
        .unwrap_or_default();

    Ok((server, otp))
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}
