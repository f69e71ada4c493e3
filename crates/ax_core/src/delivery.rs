use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Returns the name of the channel, e.g. `slack`
    fn name(&self) -> &str;

    /// Delivers a single digest block
    async fn send(&self, text: &str) -> Result<()>;
}
