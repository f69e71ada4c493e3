use async_trait::async_trait;
use ax_core::{Error, NotificationChannel, Result};
use serde_json::json;
use url::Url;

/// Posts blocks to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackWebhookChannel {
    client: reqwest::Client,
    webhook: Url,
}

impl SlackWebhookChannel {
    pub fn new(webhook_url: &str) -> Result<Self> {
        let webhook = Url::parse(webhook_url)
            .map_err(|e| Error::InvalidUrl(format!("Failed to parse Slack webhook URL: {}", e)))?;
        Ok(Self {
            client: reqwest::Client::new(),
            webhook,
        })
    }
}

#[async_trait]
impl NotificationChannel for SlackWebhookChannel {
    fn name(&self) -> &str {
        "slack"
    }

    async fn send(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.webhook.clone())
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("Slack webhook returned {}", status)));
        }
        Ok(())
    }
}
