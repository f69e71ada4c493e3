use std::sync::Arc;

use ax_core::digest::{self, Digest};
use ax_core::scoring::filter_and_rank;
use ax_core::{FilterSpec, KeywordWeights, ListingSource, QueryBuilder, Result, ScoredResult, SearchQuery};
use chrono::NaiveDate;
use tracing::info;

use crate::extract::ListingExtractor;

/// Everything a run depends on besides the listing itself.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub spec: FilterSpec,
    pub weights: KeywordWeights,
    pub threshold: f64,
}

/// What one run produced.
#[derive(Debug)]
pub struct RunReport {
    pub query: SearchQuery,
    pub extracted: usize,
    pub skipped: usize,
    pub results: Vec<ScoredResult>,
    pub digest: Digest,
}

/// Query -> fetch -> extract -> score/rank -> format. Holds no state between runs.
pub struct Pipeline {
    source: Arc<dyn ListingSource>,
    query_builder: QueryBuilder,
    extractor: ListingExtractor,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(source: Arc<dyn ListingSource>, config: PipelineConfig) -> Self {
        Self {
            source,
            query_builder: QueryBuilder::new(),
            extractor: ListingExtractor::new(),
            config,
        }
    }

    pub fn with_query_builder(mut self, query_builder: QueryBuilder) -> Self {
        self.query_builder = query_builder;
        self
    }

    pub fn query(&self, as_of: NaiveDate) -> Result<SearchQuery> {
        self.query_builder.build(&self.config.spec, as_of)
    }

    pub async fn run(&self, as_of: NaiveDate) -> Result<RunReport> {
        // Invalid filters fail here, before any network I/O.
        let query = self.query(as_of)?;

        let html = self.source.fetch(&query).await?;
        let extraction = self.extractor.extract_report(&html);
        let extracted = extraction.articles.len();
        info!("📰 Extracted {} articles via {}", extracted, self.source.name());

        let results = filter_and_rank(extraction.articles, &self.config.weights, self.config.threshold);
        info!(
            "🔍 Kept {} of {} articles (threshold {})",
            results.len(),
            extracted,
            self.config.threshold
        );

        let digest = digest::format(&results, as_of);
        Ok(RunReport {
            query,
            extracted,
            skipped: extraction.skipped,
            results,
            digest,
        })
    }
}
