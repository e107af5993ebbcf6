use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{AlertSender, SenderError};

/// JSON payload understood by a Teams incoming webhook.
#[derive(Debug, Serialize)]
pub struct TeamsMessage {
    pub text: String,
}

/// Pushes alert messages to a Teams-compatible incoming webhook.
pub struct TeamsWebhookSender {
    client: Client,
    webhook_url: String,
}

impl TeamsWebhookSender {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }
}

#[async_trait]
impl AlertSender for TeamsWebhookSender {
    async fn send(&self, message: &str) -> Result<(), SenderError> {
        let payload = TeamsMessage {
            text: message.to_string(),
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read response body".to_string());
            return Err(SenderError::SendFailed(format!(
                "webhook returned non-success status {status}: {body}"
            )));
        }

        Ok(())
    }
}
