use serde::Deserialize;
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("pollInterval must be a positive number of seconds")]
    InvalidPollInterval,
}

/// Monitor configuration, loaded once at startup and immutable for the
/// process lifetime.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Seconds to sleep between poll cycles. Must be positive.
    pub poll_interval: u64,
    #[serde(rename = "teamsWebhookURL")]
    pub teams_webhook_url: String,
    /// Hosts to poll, in order. May be empty; duplicates are each polled
    /// and alerted independently.
    pub servers: Vec<Server>,
}

/// A single monitored host.
#[derive(Deserialize, Debug, Clone)]
pub struct Server {
    pub address: String,
}

/// Loads and validates the monitor configuration from a JSON file.
pub fn load_config(path: &str) -> Result<MonitorConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;

    let config: MonitorConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;

    if config.poll_interval == 0 {
        return Err(ConfigError::InvalidPollInterval);
    }

    Ok(config)
}
