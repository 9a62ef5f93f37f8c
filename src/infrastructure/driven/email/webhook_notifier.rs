use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::application::ports::notifier::{Notifier, OutboundEmail};
use crate::infrastructure::config::app_config::MailConfig;

/// Delivers mail by POSTing a JSON payload to an HTTP mail gateway.
/// No retries: a non-success response or transport error is returned to
/// the caller as-is.
pub struct WebhookNotifier {
    config: MailConfig,
    http_client: Client,
}

impl WebhookNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, email: &OutboundEmail) -> Result<()> {
        let payload = json!({
            "from": self.config.sender,
            "to": email.to,
            "subject": email.subject,
            "text": email.body,
        });

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("error reaching mail gateway: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response text>".to_string());
            return Err(anyhow!("mail gateway rejected message: {} - {}", status, text));
        }

        Ok(())
    }
}
