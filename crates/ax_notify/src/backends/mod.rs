pub mod memory;
pub mod stdout;

#[cfg(feature = "slack")]
pub mod slack;

#[cfg(feature = "line")]
pub mod line;

pub use memory::MemoryChannel;
pub use stdout::StdoutChannel;

#[cfg(feature = "slack")]
pub use slack::SlackWebhookChannel;

#[cfg(feature = "line")]
pub use line::LineNotifyChannel;
