use std::collections::BTreeMap;

use ax_core::{Article, LinkKind};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Outcome of parsing one listing page.
#[derive(Debug, Default)]
pub struct Extraction {
    pub articles: Vec<Article>,
    /// Entries dropped for lacking a title or abstract.
    pub skipped: usize,
}

/// Parses the `li.arxiv-result` entries of an advanced-search listing.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    entry: Selector,
    title: Selector,
    authors: Selector,
    abstract_full: Selector,
    links: Selector,
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self {
            entry: Selector::parse("li.arxiv-result").unwrap(),
            title: Selector::parse("p.title").unwrap(),
            authors: Selector::parse("p.authors a").unwrap(),
            abstract_full: Selector::parse("p.abstract span.abstract-full").unwrap(),
            links: Selector::parse("a[href*='arxiv']").unwrap(),
        }
    }
}

impl ListingExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Articles in listing order. Malformed entries are skipped.
    pub fn extract(&self, html: &str) -> Vec<Article> {
        self.extract_report(html).articles
    }

    pub fn extract_report(&self, html: &str) -> Extraction {
        let document = Html::parse_document(html);
        let mut extraction = Extraction::default();

        for (index, entry) in document.select(&self.entry).enumerate() {
            match self.parse_entry(entry) {
                Some(article) => extraction.articles.push(article),
                None => {
                    debug!("Skipping listing entry {}: missing title or abstract", index);
                    extraction.skipped += 1;
                }
            }
        }

        if extraction.skipped > 0 {
            warn!(
                "⚠️ Skipped {} malformed listing entries ({} parsed)",
                extraction.skipped,
                extraction.articles.len()
            );
        }
        extraction
    }

    fn parse_entry(&self, entry: ElementRef<'_>) -> Option<Article> {
        let title = entry.select(&self.title).next().and_then(first_text)?;
        let abstract_text = entry.select(&self.abstract_full).next().and_then(first_text)?;

        let authors = entry
            .select(&self.authors)
            .filter_map(first_text)
            .collect();

        let mut links = BTreeMap::new();
        for link in entry.select(&self.links) {
            if let Some(href) = link.value().attr("href") {
                let text = link.text().collect::<String>();
                links.insert(LinkKind::classify(&text), href.to_string());
            }
        }

        Some(Article {
            title,
            authors,
            abstract_text,
            links,
        })
    }
}

/// First non-blank text node under `element`, trimmed.
fn first_text(element: ElementRef<'_>) -> Option<String> {
    element
        .text()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, title: Option<&str>, abstract_text: Option<&str>) -> String {
        let title = title
            .map(|t| format!(r#"<p class="title is-5 mathjax">
        {t}
      </p>"#))
            .unwrap_or_default();
        let abstract_block = abstract_text
            .map(|a| format!(r#"<p class="abstract mathjax">
        <span class="abstract-short has-text-grey-dark mathjax">{a}…</span>
        <span class="abstract-full has-text-grey-dark mathjax" style="display: none;">
          {a}
          <a class="is-size-7" style="white-space: nowrap;">&#9651; Less</a>
        </span>
      </p>"#))
            .unwrap_or_default();

        format!(r#"
    <li class="arxiv-result">
      <div class="is-marginless">
        <p class="list-title is-inline-block"><a href="https://arxiv.org/abs/{id}">arXiv:{id}</a>
          <span>&nbsp;[<a href="https://arxiv.org/pdf/{id}">pdf</a>, <a href="https://arxiv.org/format/{id}">other</a>]&nbsp;</span>
        </p>
      </div>
      {title}
      <p class="authors">
        <span class="has-text-black-bis has-text-weight-semibold">Authors:</span>
        <a href="/a/rubin_v_1">Vera Rubin</a>,
        <a href="/a/zwicky_f_1">Fritz Zwicky</a>
      </p>
      {abstract_block}
    </li>"#)
    }

    fn listing(entries: &[String]) -> String {
        format!(
            r#"<html><body><ol class="breathe-horizontal">{}</ol></body></html>"#,
            entries.join("\n")
        )
    }

    #[test]
    fn test_extracts_fields() {
        let html = listing(&[entry("2401.00001", Some("Halo shapes"), Some("We study dark matter."))]);
        let articles = ListingExtractor::new().extract(&html);

        assert_eq!(articles.len(), 1);
        let article = &articles[0];
        assert_eq!(article.title, "Halo shapes");
        assert_eq!(article.authors, vec!["Vera Rubin", "Fritz Zwicky"]);
        assert_eq!(article.abstract_text, "We study dark matter.");
        assert_eq!(article.primary_url(), Some("https://arxiv.org/abs/2401.00001"));
        assert_eq!(
            article.links.get(&LinkKind::Other("pdf".to_string())).map(String::as_str),
            Some("https://arxiv.org/pdf/2401.00001")
        );
        assert_eq!(
            article.links.get(&LinkKind::Other("other".to_string())).map(String::as_str),
            Some("https://arxiv.org/format/2401.00001")
        );
    }

    #[test]
    fn test_preserves_listing_order() {
        let html = listing(&[
            entry("1", Some("first"), Some("a")),
            entry("2", Some("second"), Some("b")),
            entry("3", Some("third"), Some("c")),
        ]);
        let titles: Vec<String> = ListingExtractor::new()
            .extract(&html)
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_missing_abstract_or_title_is_skipped() {
        let html = listing(&[
            entry("1", Some("kept"), Some("abstract")),
            entry("2", Some("no abstract"), None),
            entry("3", None, Some("no title")),
        ]);
        let extraction = ListingExtractor::new().extract_report(&html);

        assert_eq!(extraction.articles.len(), 1);
        assert_eq!(extraction.articles[0].title, "kept");
        assert_eq!(extraction.skipped, 2);
    }

    #[test]
    fn test_missing_authors_tolerated() {
        let html = listing(&[r#"<li class="arxiv-result">
            <p class="title">Lonely paper</p>
            <p class="abstract"><span class="abstract-full">Text</span></p>
        </li>"#.to_string()]);
        let articles = ListingExtractor::new().extract(&html);

        assert_eq!(articles.len(), 1);
        assert!(articles[0].authors.is_empty());
        assert!(articles[0].primary_url().is_none());
    }

    #[test]
    fn test_empty_listing() {
        let extraction = ListingExtractor::new().extract_report("<html><body><p>No results</p></body></html>");
        assert!(extraction.articles.is_empty());
        assert_eq!(extraction.skipped, 0);
    }
}
