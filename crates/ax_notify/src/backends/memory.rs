use async_trait::async_trait;
use ax_core::{Error, NotificationChannel, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps delivered blocks in memory. Used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    name: String,
    sent: Arc<RwLock<Vec<String>>>,
    fail: bool,
}

impl MemoryChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A channel whose every send fails.
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    pub async fn sent(&self) -> Vec<String> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl NotificationChannel for MemoryChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Transport(format!("{} is unavailable", self.name)));
        }
        self.sent.write().await.push(text.to_string());
        Ok(())
    }
}
