use std::{cmp::Ordering, collections::HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    catalog::Product,
    config::{JitterConfig, SearchConfig},
};

use super::{
    ExactOverlapStrategy, FuzzyCosineStrategy, Jitter, RankingError, ScoredCandidate,
    ScoringStrategy, SearchQuery, StrategyKind,
};

/// Score of one returned product, reported alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductScore {
    pub id: String,
    pub score: f64,
    pub exact_matches: usize,
}

impl From<&ScoredCandidate<'_>> for ProductScore {
    fn from(candidate: &ScoredCandidate<'_>) -> Self {
        ProductScore {
            id: candidate.product.id.clone(),
            score: candidate.score,
            exact_matches: candidate.exact_matches,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ranked {
    pub products: Vec<Product>,
    /// Parallel to `products`.
    pub scores: Vec<ProductScore>,
    /// Products above the threshold before truncation. For two-pass fuzzy
    /// ranking this is counted in the broad pass.
    pub total_found: usize,
    pub strategy: Option<StrategyKind>,
}

impl Ranked {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

pub struct RankingPipeline {
    exact: ExactOverlapStrategy,
    fuzzy: Option<FuzzyCosineStrategy>,
    min_threshold: f64,
    min_fuzzy_candidates: usize,
    overfetch_factor: usize,
    jitter: JitterConfig,
}

impl RankingPipeline {
    pub fn from_config(config: &SearchConfig) -> Result<Self, RankingError> {
        let fuzzy = if config.fuzzy.enabled {
            Some(FuzzyCosineStrategy::new(&config.fuzzy)?)
        } else {
            None
        };

        Ok(Self {
            exact: ExactOverlapStrategy::new(&config.exact),
            fuzzy,
            min_threshold: config.min_threshold,
            min_fuzzy_candidates: config.fuzzy.min_candidates,
            overfetch_factor: config.overfetch_factor.max(1),
            jitter: config.jitter.clone(),
        })
    }

    /// Ranks with the query's preferred strategy.
    ///
    /// Fuzzy scoring runs in two passes when the universe is larger than
    /// `limit * overfetch_factor`: a broad pass picks a shortlist, then the
    /// shortlist is re-scored with a vector space fitted on it alone. Any
    /// fuzzy failure degrades to exact overlap for this query.
    pub fn rank(&self, query: &SearchQuery, candidates: &[Product]) -> Ranked {
        if candidates.is_empty() {
            return Ranked::default();
        }

        if let Some(fuzzy) = self.fuzzy_for(query, candidates.len()) {
            match self.rank_fuzzy(fuzzy, query, candidates) {
                Ok(ranked) => return ranked,
                Err(e) => {
                    log::warn!("fuzzy scoring unavailable, using exact tag overlap: {e}");
                }
            }
        }

        self.rank_exact(query, candidates)
    }

    /// Ranks by exact tag overlap only.
    pub fn rank_exact(&self, query: &SearchQuery, candidates: &[Product]) -> Ranked {
        let mut jitter = Jitter::from_config(&self.jitter);
        let scored = self.exact.score_all(query.tags(), candidates, &mut jitter);
        self.finish(scored, query.limit(), self.exact.kind())
    }

    fn fuzzy_for(&self, query: &SearchQuery, candidates: usize) -> Option<&FuzzyCosineStrategy> {
        if query.strategy() != StrategyKind::FuzzyCosine {
            return None;
        }
        if candidates < self.min_fuzzy_candidates {
            log::debug!(
                "{candidates} candidates is below the fuzzy minimum of {}",
                self.min_fuzzy_candidates
            );
            return None;
        }
        self.fuzzy.as_ref()
    }

    fn rank_fuzzy(
        &self,
        fuzzy: &FuzzyCosineStrategy,
        query: &SearchQuery,
        candidates: &[Product],
    ) -> Result<Ranked, RankingError> {
        let mut jitter = Jitter::off();
        let shortlist_len = query.limit().saturating_mul(self.overfetch_factor);

        let scored = fuzzy.score(query.tags(), candidates, &mut jitter)?;
        if candidates.len() <= shortlist_len {
            return Ok(self.finish(scored, query.limit(), fuzzy.kind()));
        }

        let broad = self.finish(scored, shortlist_len, fuzzy.kind());
        let (shortlist, total_found) = (broad.products, broad.total_found);
        log::debug!(
            "refining {} of {} candidates",
            shortlist.len(),
            candidates.len()
        );
        if shortlist.is_empty() {
            return Ok(Ranked {
                strategy: Some(fuzzy.kind()),
                ..Ranked::default()
            });
        }

        let refined = fuzzy.score(query.tags(), &shortlist, &mut jitter)?;
        // the shortlist caps the refined count, report the broad one
        Ok(Ranked {
            total_found,
            ..self.finish(refined, query.limit(), fuzzy.kind())
        })
    }

    /// Thresholds, orders and truncates scored candidates.
    fn finish(
        &self,
        mut scored: Vec<ScoredCandidate<'_>>,
        limit: usize,
        strategy: StrategyKind,
    ) -> Ranked {
        scored.retain(|c| c.score.is_finite() && c.score > self.min_threshold);
        scored.sort_by(compare_scored);

        let mut seen = HashSet::new();
        scored.retain(|c| seen.insert(c.product.id.clone()));

        let total_found = scored.len();
        scored.truncate(limit);

        Ranked {
            products: scored.iter().map(|c| c.product.clone()).collect(),
            scores: scored.iter().map(ProductScore::from).collect(),
            total_found,
            strategy: Some(strategy),
        }
    }
}

/// Score descending, then more exact matches, then id ascending.
fn compare_scored(a: &ScoredCandidate<'_>, b: &ScoredCandidate<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.exact_matches.cmp(&a.exact_matches))
        .then_with(|| a.product.id.cmp(&b.product.id))
}
