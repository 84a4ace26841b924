//! Configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with an environment override
//! for the sensitive access token (`SKYLIFT_ACCESS_TOKEN`). [`Config`]
//! implements [`StartPolicy`], so it can be handed directly to the start
//! orchestrator.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::ConfigError;
use crate::port::StartPolicy;

/// Environment variable overriding the configured access token.
pub const ACCESS_TOKEN_ENV: &str = "SKYLIFT_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub timeouts: TimeoutConfig,
    pub logging: LoggingConfig,
    /// Access credential handed to the log-tailing connection. Usually
    /// supplied via `SKYLIFT_ACCESS_TOKEN` rather than the config file.
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// REST API URL of the control plane.
    pub api_url: String,
    /// WebSocket URL of the log-streaming endpoint.
    pub log_stream_url: String,
    /// Per-request timeout for control-plane calls.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// How long to wait for staging to complete.
    pub staging_timeout_secs: u64,
    /// How long to wait for every instance to run.
    pub startup_timeout_secs: u64,
    /// Pause between consecutive polls.
    pub polling_interval_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from a TOML file, apply the environment override
    /// for the access token, and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            config.access_token = token;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.network.api_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "network.api_url",
                reason: "cannot be empty".into(),
            });
        }
        if self.network.log_stream_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "network.log_stream_url",
                reason: "cannot be empty".into(),
            });
        }
        if self.timeouts.polling_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeouts.polling_interval_secs",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Initialize the tracing subscriber with this configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.run.skylift.io".into(),
            log_stream_url: "wss://logs.run.skylift.io".into(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            staging_timeout_secs: 15 * 60,
            startup_timeout_secs: 5 * 60,
            polling_interval_secs: 3,
        }
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl StartPolicy for Config {
    fn staging_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.staging_timeout_secs)
    }

    fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.startup_timeout_secs)
    }

    fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.timeouts.polling_interval_secs)
    }

    fn access_token(&self) -> String {
        self.access_token.clone()
    }
}
