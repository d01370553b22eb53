//! Configuration loading from TOML files.
//!
//! Every section has serde defaults, so a partial file (or none at all, via
//! [`Config::default`]) yields a working configuration pointed at a local
//! Lotus node.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::error::{ConfigError, Result};

/// Default Lotus JSON-RPC websocket endpoint.
pub const DEFAULT_NODE_URL: &str = "ws://localhost:7777/0/node/rpc/v0";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub deal: DealConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote node endpoint.
#[derive(Debug, Deserialize)]
pub struct NodeConfig {
    pub ws_url: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_NODE_URL.into(),
        }
    }
}

/// Fixed proposal defaults, overridable per deployment.
#[derive(Debug, Deserialize)]
pub struct DealConfig {
    /// Price per epoch in attoFIL.
    pub epoch_price: String,
    /// Minimum deal duration in blocks.
    pub min_blocks_duration: u64,
}

impl Default for DealConfig {
    fn default() -> Self {
        Self {
            epoch_price: "2500".into(),
            min_blocks_duration: 300,
        }
    }
}

/// Polling cadence and optional overall deadline for deal tracking.
#[derive(Debug, Deserialize)]
pub struct TrackerConfig {
    pub poll_interval_ms: u64,
    /// Overall wall-clock limit on a tracking session. `None` polls until a
    /// terminal state or cancellation.
    pub deadline_secs: Option<u64>,
}

impl TrackerConfig {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            deadline_secs: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
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

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.node.ws_url).map_err(|e| ConfigError::InvalidValue {
            field: "node.ws_url",
            reason: e.to_string(),
        })?;
        if url.scheme() != "ws" && url.scheme() != "wss" {
            return Err(ConfigError::InvalidValue {
                field: "node.ws_url",
                reason: format!("expected ws:// or wss:// scheme, got {}", url.scheme()),
            }
            .into());
        }
        if self.tracker.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tracker.poll_interval_ms",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if self.deal.epoch_price.is_empty() || !self.deal.epoch_price.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidValue {
                field: "deal.epoch_price",
                reason: "must be a non-negative integer string".into(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.node.ws_url, DEFAULT_NODE_URL);
        assert_eq!(config.deal.epoch_price, "2500");
        assert_eq!(config.deal.min_blocks_duration, 300);
        assert_eq!(config.tracker.cadence(), Duration::from_secs(1));
        assert_eq!(config.tracker.deadline(), None);
    }

    #[test]
    fn rejects_non_websocket_scheme() {
        let config: Config = toml::from_str("[node]\nws_url = \"http://localhost:1234\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_cadence() {
        let config: Config = toml::from_str("[tracker]\npoll_interval_ms = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_numeric_price() {
        let config: Config = toml::from_str("[deal]\nepoch_price = \"cheap\"\nmin_blocks_duration = 300").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str("[tracker]\npoll_interval_ms = 250").unwrap();
        assert_eq!(config.tracker.cadence(), Duration::from_millis(250));
        assert_eq!(config.node.ws_url, DEFAULT_NODE_URL);
    }
}
