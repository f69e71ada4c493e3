use async_trait::async_trait;
use ax_core::{NotificationChannel, Result};

/// Prints each block to standard output.
#[derive(Debug, Clone, Default)]
pub struct StdoutChannel;

impl StdoutChannel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationChannel for StdoutChannel {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn send(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}
