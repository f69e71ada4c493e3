use async_trait::async_trait;
use ax_core::{Error, NotificationChannel, Result};
use url::Url;

pub const LINE_NOTIFY_API: &str = "https://notify-api.line.me/api/notify";

/// Pushes blocks through LINE Notify with a bearer token.
#[derive(Debug, Clone)]
pub struct LineNotifyChannel {
    client: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl LineNotifyChannel {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(LINE_NOTIFY_API, token)
    }

    pub fn with_endpoint(endpoint: &str, token: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::InvalidUrl(format!("Failed to parse LINE endpoint: {}", e)))?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            token: token.into(),
        })
    }
}

#[async_trait]
impl NotificationChannel for LineNotifyChannel {
    fn name(&self) -> &str {
        "line"
    }

    async fn send(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .form(&[("message", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("LINE Notify returned {}", status)));
        }
        Ok(())
    }
}
