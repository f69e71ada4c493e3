use chrono::NaiveDate;
use serde::Serialize;

use crate::types::ScoredResult;

const SEPARATOR_WIDTH: usize = 80;
const COUNT_LABEL: &str = "num of articles = ";

/// Formatted output of one run: a header block followed by one block per
/// kept result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Digest {
    blocks: Vec<String>,
}

impl Digest {
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn header(&self) -> Option<&str> {
        self.blocks.first().map(String::as_str)
    }

    /// Result blocks, without the header.
    pub fn entries(&self) -> &[String] {
        self.blocks.get(1..).unwrap_or_default()
    }

    /// Article count as written in the header block.
    pub fn header_count(&self) -> Option<usize> {
        let header = self.header()?;
        let start = header.find(COUNT_LABEL)? + COUNT_LABEL.len();
        header[start..]
            .split(|c: char| !c.is_ascii_digit())
            .next()?
            .parse()
            .ok()
    }
}

pub fn separator() -> String {
    "*".repeat(SEPARATOR_WIDTH)
}

/// Renders results in the order given. Does not sort or filter.
pub fn format(results: &[ScoredResult], run_date: NaiveDate) -> Digest {
    let star = separator();
    let mut blocks = Vec::with_capacity(results.len() + 1);

    blocks.push(format!(
        "{star}\n \t \t {run_date}\t{COUNT_LABEL}{}\n{star}",
        results.len()
    ));
    blocks.extend(results.iter().map(|result| format_result(result, &star)));

    Digest { blocks }
}

fn format_result(result: &ScoredResult, star: &str) -> String {
    let keywords = result
        .matched_keywords
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "\n score: `{:?}`\
         \n hit keywords: `{}`\
         \n url: {}\
         \n title:    {}\
         \n authors:    {}\
         \n abstract:\
         \n \t {}\
         \n {}",
        result.score,
        keywords,
        result.url(),
        result.article.title,
        result.article.authors_line(),
        result.article.abstract_text,
        star,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Article, LinkKind};
    use std::collections::{BTreeMap, BTreeSet};

    fn result(title: &str, score: f64, keywords: &[&str]) -> ScoredResult {
        ScoredResult {
            article: Article {
                title: title.to_string(),
                authors: vec!["Vera Rubin".to_string(), "Fritz Zwicky".to_string()],
                abstract_text: "We study the dark matter halo.".to_string(),
                links: BTreeMap::from([(
                    LinkKind::Arxiv,
                    "https://arxiv.org/abs/2401.00001".to_string(),
                )]),
            },
            score,
            matched_keywords: keywords.iter().map(|k| k.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_header_block() {
        let digest = format(&[], run_date());
        assert_eq!(digest.blocks().len(), 1);

        let header = digest.header().unwrap();
        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "*".repeat(80));
        assert_eq!(lines[2], lines[0]);
        assert!(lines[1].contains("2024-01-15"));
        assert_eq!(digest.header_count(), Some(0));
    }

    #[test]
    fn test_result_block_contents() {
        let digest = format(&[result("Halo shapes", 2.0, &["dark matter", "halo"])], run_date());
        let block = &digest.entries()[0];

        assert!(block.contains("score: `2.0`"));
        assert!(block.contains("hit keywords: `dark matter, halo`"));
        assert!(block.contains("url: https://arxiv.org/abs/2401.00001"));
        assert!(block.contains("title:    Halo shapes"));
        assert!(block.contains("authors:    Vera Rubin, Fritz Zwicky"));
        assert!(block.contains("\t We study the dark matter halo."));
        assert!(block.ends_with(&separator()));
    }

    #[test]
    fn test_block_count_matches_header() {
        let results: Vec<_> = (0..7).map(|i| result(&format!("paper {i}"), 7.0 - i as f64, &["x"])).collect();
        let digest = format(&results, run_date());

        assert_eq!(digest.header_count(), Some(results.len()));
        assert_eq!(digest.entries().len(), results.len());
    }

    #[test]
    fn test_format_keeps_given_order() {
        let results = vec![result("low", 1.0, &["a"]), result("high", 9.0, &["b"])];
        let digest = format(&results, run_date());
        assert!(digest.entries()[0].contains("title:    low"));
        assert!(digest.entries()[1].contains("title:    high"));
    }
}
