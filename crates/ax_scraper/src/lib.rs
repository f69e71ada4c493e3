pub mod extract;
pub mod http;
pub mod pipeline;

pub use extract::{Extraction, ListingExtractor};
pub use http::HttpListingSource;
pub use pipeline::{Pipeline, PipelineConfig, RunReport};
