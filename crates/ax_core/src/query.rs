//! Query string construction for the arXiv advanced search form.
//!
//! The endpoint reads the form fields in a fixed order, so fields are always
//! emitted as: form marker, empty title term, classification block, date block,
//! then abstracts/size/order.

use std::fmt;

use chrono::{Days, NaiveDate};
use url::Url;

use crate::types::{FilterSpec, Subject};
use crate::{Error, Result};

pub const DEFAULT_SEARCH_URL: &str = "https://arxiv.org/search/advanced";

const DATE_FORMAT: &str = "%Y-%m-%d";
const ORDER: &str = "-submitted_date";

/// A built query: the literal query string plus the endpoint it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    base: Url,
    query: String,
}

impl SearchQuery {
    pub fn query_string(&self) -> &str {
        &self.query
    }

    pub fn url(&self) -> String {
        format!("{}?{}", self.base, self.query)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// One-day window `[from, to]` with `to = from + 1 day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn ending_days_ago(as_of: NaiveDate, days_ago: u32) -> Result<Self> {
        let from = as_of
            .checked_sub_days(Days::new(days_ago.into()))
            .ok_or_else(|| Error::InvalidSpec(format!("days_ago out of range: {}", days_ago)))?;
        let to = from
            .checked_add_days(Days::new(1))
            .ok_or_else(|| Error::InvalidSpec(format!("date out of range: {}", from)))?;
        Ok(Self { from, to })
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base: Url,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_SEARCH_URL).expect("default search URL is valid"),
        }
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base: &str) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| Error::InvalidUrl(format!("Failed to parse search URL {}: {}", base, e)))?;
        Ok(Self { base })
    }

    pub fn build(&self, spec: &FilterSpec, as_of: NaiveDate) -> Result<SearchQuery> {
        spec.validate()?;
        let window = DateWindow::ending_days_ago(as_of, spec.days_ago)?;

        let fields = [
            "advanced=".to_string(),
            terms_block(),
            classification_block(spec),
            date_block(spec, window),
            format!("abstracts={}", if spec.show_abstract { "show" } else { "hide" }),
            format!("size={}", spec.page_size),
            format!("order={}", ORDER),
        ];

        Ok(SearchQuery {
            base: self.base.clone(),
            query: fields.join("&"),
        })
    }
}

// Title search left blank; only the classification and date filters narrow results.
fn terms_block() -> String {
    ["terms-0-operator=AND", "terms-0-term=", "terms-0-field=title"].join("&")
}

fn classification_block(spec: &FilterSpec) -> String {
    let mut fields: Vec<String> = spec
        .subjects
        .iter()
        .map(|subject| format!("classification-{}=y", subject.token()))
        .collect();

    if spec.subjects.contains(&Subject::Physics) {
        fields.push(format!("classification-physics_archives={}", spec.subcategory));
    }

    let cross_list = if spec.include_cross_listed { "include" } else { "exclude" };
    fields.push(format!("classification-include_cross_list={}", cross_list));
    fields.join("&")
}

fn date_block(spec: &FilterSpec, window: DateWindow) -> String {
    [
        "date-year=".to_string(),
        "date-filter_by=date_range".to_string(),
        format!("date-from_date={}", window.from.format(DATE_FORMAT)),
        format!("date-to_date={}", window.to.format(DATE_FORMAT)),
        format!("date-date_type={}", spec.date_type.as_query_value()),
    ]
    .join("&")
}
