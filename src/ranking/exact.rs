//! Exact tag-overlap scoring.
//!
//! `score = |Q ∩ P| / max(|Q|, 1)`, multiplied by `multi_match_boost` once at
//! least `multi_match_min` tags agree, plus optional jitter. Products sharing
//! no tag with the query are ineligible.

use crate::{catalog::Product, config::ExactConfig, tags::TagSet};

use super::{Jitter, RankingError, ScoredCandidate, ScoringStrategy, StrategyKind};

#[derive(Debug, Clone)]
pub struct ExactOverlapStrategy {
    multi_match_boost: f64,
    multi_match_min: usize,
}

impl ExactOverlapStrategy {
    pub fn new(config: &ExactConfig) -> Self {
        Self {
            multi_match_boost: config.multi_match_boost,
            multi_match_min: config.multi_match_min,
        }
    }

    /// Score before jitter and the match count, or `None` without overlap.
    pub fn base_score(&self, query: &TagSet, product_tags: &[String]) -> Option<(f64, usize)> {
        let matches = query.overlap(product_tags);
        let mut score = matches as f64 / query.len().max(1) as f64;

        if matches >= self.multi_match_min {
            score *= self.multi_match_boost;
        }

        if score <= 0.0 {
            None
        } else {
            Some((score, matches))
        }
    }

    pub fn score_all<'a>(
        &self,
        query: &TagSet,
        candidates: &'a [Product],
        jitter: &mut Jitter,
    ) -> Vec<ScoredCandidate<'a>> {
        candidates
            .iter()
            .filter_map(|product| {
                self.base_score(query, &product.tags)
                    .map(|(score, exact_matches)| ScoredCandidate {
                        product,
                        score: score + jitter.sample(),
                        exact_matches,
                    })
            })
            .collect()
    }
}

impl Default for ExactOverlapStrategy {
    fn default() -> Self {
        Self::new(&ExactConfig::default())
    }
}

impl ScoringStrategy for ExactOverlapStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ExactOverlap
    }

    fn score<'a>(
        &self,
        query: &TagSet,
        candidates: &'a [Product],
        jitter: &mut Jitter,
    ) -> Result<Vec<ScoredCandidate<'a>>, RankingError> {
        Ok(self.score_all(query, candidates, jitter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_single_match_has_no_boost() {
        let strategy = ExactOverlapStrategy::default();
        let query = TagSet::new(["c_sehpa", "yan_sehpa"]);

        let (score, matches) = strategy
            .base_score(&query, &tags(&["c_sehpa", "modern_mobilya"]))
            .unwrap();
        assert_eq!(matches, 1);
        assert!((score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_multi_match_boost() {
        let strategy = ExactOverlapStrategy::default();
        let query = TagSet::new(["a", "b", "c", "d"]);

        let (score, matches) = strategy.base_score(&query, &tags(&["a", "b", "x"])).unwrap();
        assert_eq!(matches, 2);
        assert!((score - 0.75).abs() < 1e-12);

        let (score, _) = strategy.base_score(&query, &tags(&["a", "b", "c", "d"])).unwrap();
        assert!((score - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_no_overlap_is_ineligible() {
        let strategy = ExactOverlapStrategy::default();
        let query = TagSet::new(["kulaklik_bluetooth"]);
        assert!(strategy.base_score(&query, &tags(&["bluetooth_kulaklik"])).is_none());
    }

    #[test]
    fn test_empty_query_is_ineligible() {
        let strategy = ExactOverlapStrategy::default();
        assert!(strategy
            .base_score(&TagSet::default(), &tags(&["anything"]))
            .is_none());
    }

    #[test]
    fn test_custom_constants() {
        let strategy = ExactOverlapStrategy::new(&ExactConfig {
            multi_match_boost: 2.0,
            multi_match_min: 3,
        });
        let query = TagSet::new(["a", "b", "c"]);

        let (score, _) = strategy.base_score(&query, &tags(&["a", "b"])).unwrap();
        assert!((score - 2.0 / 3.0).abs() < 1e-12);

        let (score, _) = strategy.base_score(&query, &tags(&["a", "b", "c"])).unwrap();
        assert!((score - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_scoring_is_idempotent_without_jitter() {
        let strategy = ExactOverlapStrategy::default();
        let query = TagSet::new(["a", "b"]);
        let first = strategy.base_score(&query, &tags(&["a", "b"]));
        let second = strategy.base_score(&query, &tags(&["a", "b"]));
        assert_eq!(first, second);
    }
}
