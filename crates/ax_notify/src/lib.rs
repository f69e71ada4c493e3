use std::fmt;
use std::sync::Arc;

use ax_core::{Digest, NotificationChannel, Result};
use tracing::{info, warn};

pub mod backends;

pub use backends::*;

/// Credentials for the channels a run should deliver to. A `None` disables
/// that channel.
#[derive(Debug, Clone, Default)]
pub struct ChannelSettings {
    pub slack_webhook: Option<String>,
    pub line_token: Option<String>,
    pub stdout: bool,
}

/// Builds the configured channels. An enabled channel with bad settings is
/// an error.
pub fn create_channels(settings: &ChannelSettings) -> Result<Vec<Arc<dyn NotificationChannel>>> {
    let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();

    #[cfg(feature = "slack")]
    if let Some(webhook) = settings.slack_webhook.as_deref() {
        channels.push(Arc::new(SlackWebhookChannel::new(webhook)?));
    }

    #[cfg(feature = "line")]
    if let Some(token) = settings.line_token.as_deref() {
        channels.push(Arc::new(LineNotifyChannel::new(token)?));
    }

    if settings.stdout {
        channels.push(Arc::new(StdoutChannel::new()));
    }

    Ok(channels)
}

/// Delivery result for one channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelOutcome {
    pub channel: String,
    pub delivered: usize,
    pub errors: Vec<String>,
}

impl ChannelOutcome {
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub outcomes: Vec<ChannelOutcome>,
}

impl DeliveryReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(ChannelOutcome::succeeded)
    }

    pub fn failed_channels(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.succeeded())
            .map(|o| o.channel.as_str())
            .collect()
    }

    pub fn succeeded_channels(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.succeeded())
            .map(|o| o.channel.as_str())
            .collect()
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.outcomes.is_empty() {
            return write!(f, "no delivery channels configured");
        }
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            if outcome.succeeded() {
                write!(f, "{}: ok ({} blocks)", outcome.channel, outcome.delivered)?;
            } else {
                write!(
                    f,
                    "{}: failed ({} delivered, {} errors: {})",
                    outcome.channel,
                    outcome.delivered,
                    outcome.errors.len(),
                    outcome.errors.join(" | ")
                )?;
            }
        }
        Ok(())
    }
}

/// Sends every digest block to every channel. A failing channel never stops
/// delivery to the others.
pub struct Dispatcher {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub async fn deliver(&self, digest: &Digest) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for channel in &self.channels {
            let mut outcome = ChannelOutcome {
                channel: channel.name().to_string(),
                ..Default::default()
            };

            for block in digest.blocks() {
                match channel.send(block).await {
                    Ok(()) => outcome.delivered += 1,
                    Err(e) => {
                        warn!("❌ Delivery to {} failed: {}", outcome.channel, e);
                        outcome.errors.push(e.to_string());
                    }
                }
            }

            if outcome.succeeded() {
                info!("📨 Delivered {} blocks to {}", outcome.delivered, outcome.channel);
            }
            report.outcomes.push(outcome);
        }

        report
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use ax_core::digest;
    use chrono::NaiveDate;

    fn digest_with_header_only() -> Digest {
        digest::format(&[], NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    #[tokio::test]
    async fn test_failing_channel_does_not_block_others() {
        let down = MemoryChannel::failing("slack");
        let up = MemoryChannel::new("line");
        let dispatcher = Dispatcher::new(vec![Arc::new(down), Arc::new(up.clone())]);

        let digest = digest_with_header_only();
        let report = dispatcher.deliver(&digest).await;

        assert!(!report.all_succeeded());
        assert_eq!(report.failed_channels(), vec!["slack"]);
        assert_eq!(report.succeeded_channels(), vec!["line"]);
        assert_eq!(up.sent().await, digest.blocks().to_vec());
        assert!(report.to_string().contains("slack: failed"));
        assert!(report.to_string().contains("line: ok (1 blocks)"));
    }

    #[tokio::test]
    async fn test_no_channels() {
        let dispatcher = Dispatcher::new(Vec::new());
        assert!(dispatcher.is_empty());
        let report = dispatcher.deliver(&digest_with_header_only()).await;
        assert!(report.all_succeeded());
        assert_eq!(report.to_string(), "no delivery channels configured");
    }

    #[test]
    fn test_create_channels_without_remote_backends() {
        assert!(create_channels(&ChannelSettings::default()).unwrap().is_empty());

        let stdout_only = ChannelSettings {
            stdout: true,
            ..Default::default()
        };
        let channels = create_channels(&stdout_only).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name(), "stdout");
    }

    #[cfg(all(feature = "slack", feature = "line"))]
    #[test]
    fn test_create_channels_from_settings() {
        let settings = ChannelSettings {
            slack_webhook: Some("https://hooks.slack.com/services/T/B/X".to_string()),
            line_token: Some("token".to_string()),
            stdout: true,
        };
        let names: Vec<String> = create_channels(&settings)
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["slack", "line", "stdout"]);
    }

    #[cfg(feature = "slack")]
    #[test]
    fn test_invalid_slack_webhook_is_rejected() {
        let bad = ChannelSettings {
            slack_webhook: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(create_channels(&bad).is_err());
    }
}
