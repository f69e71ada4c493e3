use std::collections::BTreeSet;

use tracing::debug;

use crate::types::{Article, KeywordWeights, ScoredResult};
use crate::{Error, Result};

/// Sums the weight of every keyword found in `text` (case-insensitive,
/// presence only) and returns the matched keywords as given in `weights`.
pub fn score(text: &str, weights: &KeywordWeights) -> (f64, BTreeSet<String>) {
    let haystack = text.to_lowercase();
    let mut total = 0.0;
    let mut matched = BTreeSet::new();

    for (keyword, weight) in weights.iter() {
        if haystack.contains(&keyword.to_lowercase()) {
            total += weight;
            matched.insert(keyword.to_string());
        }
    }

    (total, matched)
}

/// Scores each article's abstract, keeps those with `score > 0` and
/// `score >= threshold`, and returns them highest score first. Equal scores
/// keep their input order.
pub fn filter_and_rank(
    articles: Vec<Article>,
    weights: &KeywordWeights,
    threshold: f64,
) -> Vec<ScoredResult> {
    let mut kept: Vec<ScoredResult> = articles
        .into_iter()
        .filter_map(|article| match require_primary_link(&article) {
            Ok(()) => Some(article),
            Err(e) => {
                debug!("Dropping article: {}", e);
                None
            }
        })
        .filter_map(|article| {
            let (score, matched_keywords) = score(&article.abstract_text, weights);
            (score > 0.0 && score >= threshold).then_some(ScoredResult {
                article,
                score,
                matched_keywords,
            })
        })
        .collect();

    // `sort_by` is stable
    kept.sort_by(|a, b| b.score.total_cmp(&a.score));
    kept
}

fn require_primary_link(article: &Article) -> Result<()> {
    match article.primary_url() {
        Some(_) => Ok(()),
        None => Err(Error::MalformedArticle(format!(
            "no arxiv link for {:?}",
            article.title
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LinkKind;
    use std::collections::BTreeMap;

    fn article(title: &str, abstract_text: &str) -> Article {
        Article {
            title: title.to_string(),
            authors: vec!["A. Author".to_string()],
            abstract_text: abstract_text.to_string(),
            links: BTreeMap::from([(
                LinkKind::Arxiv,
                format!("https://arxiv.org/abs/{}", title),
            )]),
        }
    }

    fn weights() -> KeywordWeights {
        [("dark matter", 2.0), ("neutrino", 1.5)].into_iter().collect()
    }

    #[test]
    fn test_score_is_case_insensitive_presence() {
        let (total, matched) = score("Dark Matter and dark matter and DARK MATTER", &weights());
        assert_eq!(total, 2.0);
        assert_eq!(matched, BTreeSet::from(["dark matter".to_string()]));
    }

    #[test]
    fn test_score_keeps_keyword_casing() {
        let weights: KeywordWeights = [("Neutrino", 1.0)].into_iter().collect();
        let (total, matched) = score("a neutrino beam", &weights);
        assert_eq!(total, 1.0);
        assert!(matched.contains("Neutrino"));
    }

    #[test]
    fn test_case_variant_keywords_are_weighted_once() {
        let weights: KeywordWeights = [("Dark Matter", 2.0), ("dark matter", 2.0)].into_iter().collect();
        let (total, matched) = score("dark matter halo", &weights);
        assert_eq!(total, 2.0);
        assert_eq!(matched, BTreeSet::from(["Dark Matter".to_string()]));
    }

    #[test]
    fn test_score_with_no_weights() {
        let (total, matched) = score("anything", &KeywordWeights::default());
        assert_eq!(total, 0.0);
        assert!(matched.is_empty());
    }

    #[test]
    fn test_adding_matching_positive_keyword_never_lowers_score() {
        let text = "galaxy cluster lensing of dark matter";
        let mut weights = weights();
        let (before, _) = score(text, &weights);
        weights.insert("lensing", 0.5);
        let (after, matched) = score(text, &weights);
        assert!(after >= before);
        assert!(matched.contains("lensing"));
    }

    #[test]
    fn test_dark_matter_ranks_above_neutrino() {
        let articles = vec![
            article("2401.00002", "... neutrino oscillation ..."),
            article("2401.00001", "... dark matter halo ..."),
        ];
        let ranked = filter_and_rank(articles, &weights(), 1.5);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].article.title, "2401.00001");
        assert_eq!(ranked[0].score, 2.0);
        assert_eq!(ranked[1].score, 1.5);
    }

    #[test]
    fn test_below_threshold_is_dropped() {
        let weights: KeywordWeights = [("quasar", 3.0)].into_iter().collect();
        let ranked = filter_and_rank(vec![article("x", "a bright quasar")], &weights, 5.0);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_zero_score_dropped_regardless_of_threshold() {
        for threshold in [-10.0, 0.0] {
            let ranked = filter_and_rank(vec![article("x", "nothing relevant")], &weights(), threshold);
            assert!(ranked.is_empty());
        }
    }

    #[test]
    fn test_missing_arxiv_link_is_excluded() {
        let mut orphan = article("orphan", "dark matter and neutrino physics");
        orphan.links = BTreeMap::from([(LinkKind::classify("pdf"), "https://arxiv.org/pdf/1".to_string())]);

        let ranked = filter_and_rank(vec![orphan, article("ok", "neutrino")], &weights(), 0.0);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].article.title, "ok");
    }

    #[test]
    fn test_ties_keep_input_order_and_output_is_non_increasing() {
        let articles = vec![
            article("a", "neutrino"),
            article("b", "dark matter"),
            article("c", "neutrino"),
            article("d", "dark matter neutrino"),
            article("e", "neutrino"),
        ];
        let ranked = filter_and_rank(articles, &weights(), 0.0);
        let titles: Vec<&str> = ranked.iter().map(|r| r.article.title.as_str()).collect();

        assert_eq!(titles, vec!["d", "b", "a", "c", "e"]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
