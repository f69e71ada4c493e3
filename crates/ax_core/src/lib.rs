pub mod delivery;
pub mod digest;
pub mod error;
pub mod listing;
pub mod query;
pub mod scoring;
pub mod types;

pub use delivery::NotificationChannel;
pub use digest::Digest;
pub use error::{Error, Result};
pub use listing::ListingSource;
pub use query::{QueryBuilder, SearchQuery};
pub use types::{Article, DateType, FilterSpec, KeywordWeights, LinkKind, ScoredResult, Subject};
