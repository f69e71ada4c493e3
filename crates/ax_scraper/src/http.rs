use std::time::Duration;

use async_trait::async_trait;
use ax_core::{Error, ListingSource, Result, SearchQuery};
use tracing::info;

const DEFAULT_USER_AGENT: &str = concat!("arxiv-digest/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches listings with a single HTTP GET. No retries.
#[derive(Debug, Clone)]
pub struct HttpListingSource {
    client: reqwest::Client,
}

impl HttpListingSource {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<String> {
        let url = query.url();
        info!("🌐 Fetching listing: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("{} returned {}", url, status)));
        }
        Ok(response.text().await?)
    }
}
