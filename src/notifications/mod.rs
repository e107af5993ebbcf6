use async_trait::async_trait;
use thiserror::Error;

pub mod webhook;

#[derive(Error, Debug)]
pub enum SenderError {
    #[error("failed to send alert: {0}")]
    SendFailed(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Delivers alert messages to an external sink.
///
/// Delivery is best-effort: callers log a failure and move on, they never
/// retry or queue.
#[async_trait]
pub trait AlertSender: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), SenderError>;
}
