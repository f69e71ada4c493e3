use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Result};

/// Top-level arXiv classification offered by the advanced search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subject {
    ComputerScience,
    Physics,
}

impl Subject {
    /// Token used in the `classification-<token>=y` query field.
    pub fn token(&self) -> &'static str {
        match self {
            Subject::ComputerScience => "computer_science",
            Subject::Physics => "physics",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Subject::ComputerScience => "Computer Science (cs)",
            Subject::Physics => "Physics",
        }
    }
}

impl FromStr for Subject {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Computer Science (cs)" | "cs" | "computer_science" => Ok(Subject::ComputerScience),
            "Physics" | "physics" => Ok(Subject::Physics),
            other => Err(Error::InvalidSpec(format!(
                "no classification mapping for subject: {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which date the search window applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateType {
    #[default]
    Submitted,
    Announced,
}

impl DateType {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            DateType::Submitted => "submitted_date",
            DateType::Announced => "announced_date_first",
        }
    }
}

impl FromStr for DateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "submitted" | "submitted_date" => Ok(DateType::Submitted),
            "announced" | "announced_date" | "announcement_date" | "announced_date_first" => {
                Ok(DateType::Announced)
            }
            other => Err(Error::InvalidSpec(format!("unknown date type: {}", other))),
        }
    }
}

/// Search filter for one run. Built once and not mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub subjects: BTreeSet<Subject>,
    pub subcategory: String,
    pub include_cross_listed: bool,
    pub date_type: DateType,
    pub days_ago: u32,
    pub show_abstract: bool,
    pub page_size: u32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            subjects: BTreeSet::from([Subject::Physics]),
            subcategory: "astro-ph".to_string(),
            include_cross_listed: true,
            date_type: DateType::Submitted,
            days_ago: 2,
            show_abstract: true,
            page_size: 200,
        }
    }
}

impl FilterSpec {
    /// Replaces the subject set from free-text labels such as `"Physics"` or
    /// `"Computer Science (cs)"`.
    pub fn with_subject_labels<I, S>(mut self, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.subjects = labels
            .into_iter()
            .map(|label| label.as_ref().parse())
            .collect::<Result<_>>()?;
        Ok(self)
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = subcategory.into();
        self
    }

    pub fn with_cross_listed(mut self, include: bool) -> Self {
        self.include_cross_listed = include;
        self
    }

    pub fn with_date_type(mut self, date_type: DateType) -> Self {
        self.date_type = date_type;
        self
    }

    pub fn with_days_ago(mut self, days_ago: u32) -> Self {
        self.days_ago = days_ago;
        self
    }

    pub fn with_abstracts(mut self, show: bool) -> Self {
        self.show_abstract = show;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.subjects.is_empty() {
            return Err(Error::InvalidSpec("at least one subject is required".to_string()));
        }
        if self.page_size == 0 {
            return Err(Error::InvalidSpec("page size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Kind of link attached to a listing entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkKind {
    /// The canonical abstract page, e.g. `arXiv:2204.01234`.
    Arxiv,
    /// Any other link, keyed by its visible text as shown (`pdf`, `PDF`, `other`).
    Other(String),
}

impl LinkKind {
    pub fn classify(text: &str) -> Self {
        let text = text.trim();
        if text.to_lowercase().contains("arxiv") {
            LinkKind::Arxiv
        } else {
            LinkKind::Other(text.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LinkKind::Arxiv => "arxiv",
            LinkKind::Other(label) => label,
        }
    }
}

impl From<String> for LinkKind {
    fn from(label: String) -> Self {
        LinkKind::classify(&label)
    }
}

impl From<LinkKind> for String {
    fn from(kind: LinkKind) -> Self {
        kind.label().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub links: BTreeMap<LinkKind, String>,
}

impl Article {
    /// The canonical `arxiv` link, if the entry carried one.
    pub fn primary_url(&self) -> Option<&str> {
        self.links.get(&LinkKind::Arxiv).map(String::as_str)
    }

    pub fn authors_line(&self) -> String {
        self.authors.join(", ")
    }
}

/// Keyword to weight mapping. Keywords match case-insensitively, so keys that
/// differ only in case are one entry: the first spelling is kept and the
/// last weight wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct KeywordWeights(BTreeMap<String, f64>);

impl KeywordWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the weight of `keyword`, returning the previous weight of any
    /// existing key equal to it ignoring case.
    pub fn insert(&mut self, keyword: impl Into<String>, weight: f64) -> Option<f64> {
        let keyword = keyword.into();
        let folded = keyword.to_lowercase();
        let existing = self.0.keys().find(|k| k.to_lowercase() == folded).cloned();

        match existing {
            Some(key) => {
                if key != keyword {
                    warn!("Keyword {:?} merged into {:?}, weight {}", keyword, key, weight);
                }
                self.0.insert(key, weight)
            }
            None => self.0.insert(keyword, weight),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for KeywordWeights {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        let mut weights = Self::new();
        for (keyword, weight) in iter {
            weights.insert(keyword, weight);
        }
        weights
    }
}

impl From<BTreeMap<String, f64>> for KeywordWeights {
    fn from(map: BTreeMap<String, f64>) -> Self {
        map.into_iter().collect()
    }
}

impl From<KeywordWeights> for BTreeMap<String, f64> {
    fn from(weights: KeywordWeights) -> Self {
        weights.0
    }
}

/// An article together with its keyword score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub article: Article,
    pub score: f64,
    pub matched_keywords: BTreeSet<String>,
}

impl ScoredResult {
    /// Canonical URL. Only articles with an `arxiv` link are ever scored.
    pub fn url(&self) -> &str {
        self.article.primary_url().unwrap_or_default()
    }
}
