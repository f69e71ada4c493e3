use async_trait::async_trait;

use crate::query::SearchQuery;
use crate::Result;

#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Fetches the rendered result listing for `query`
    async fn fetch(&self, query: &SearchQuery) -> Result<String>;
}
