//! Gateway configuration loaded from environment variables.

use common::DittoDuration;
use ditto_headers::HeadersConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `8080`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DITTO_GATEWAY_MAX_TIMEOUT`: largest accepted `timeout` header (default: `60s`)
///
/// Header limits are read by [`HeadersConfig::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_timeout: DittoDuration,
    pub headers: HeadersConfig,
}

impl Config {
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_MAX_TIMEOUT_SECS: u64 = 60;

    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            max_timeout: std::env::var("DITTO_GATEWAY_MAX_TIMEOUT")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.max_timeout),
            headers: HeadersConfig::from_env(),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: Self::DEFAULT_PORT,
            log_level: "info".to_string(),
            max_timeout: DittoDuration::from_secs(Self::DEFAULT_MAX_TIMEOUT_SECS),
            headers: HeadersConfig::default(),
        }
    }
}
