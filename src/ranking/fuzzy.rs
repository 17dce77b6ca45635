//! Fuzzy tag scoring.
//!
//! The query tags and each candidate's tags are joined with spaces into one
//! document apiece. A vectorizer is fitted on the query document plus all
//! candidate documents, so idf depends on the candidate universe of the
//! current query. `score = cosine * (1 + exact_match_boost * exact_matches)`.

use crate::{catalog::Product, config::FuzzyConfig, tags::TagSet};

use super::{
    cosine_similarity, CharNgramVectorizer, Jitter, RankingError, ScoredCandidate,
    ScoringStrategy, StrategyKind,
};

#[derive(Debug, Clone)]
pub struct FuzzyCosineStrategy {
    vectorizer: CharNgramVectorizer,
    exact_match_boost: f64,
}

impl FuzzyCosineStrategy {
    pub fn new(config: &FuzzyConfig) -> Result<Self, RankingError> {
        Ok(Self {
            vectorizer: CharNgramVectorizer::new(config.ngram_min, config.ngram_max)?,
            exact_match_boost: config.exact_match_boost,
        })
    }

    /// Non-decreasing in `exact_matches` for a fixed similarity.
    pub fn boosted(&self, similarity: f64, exact_matches: usize) -> f64 {
        similarity * (1.0 + self.exact_match_boost * exact_matches as f64)
    }
}

impl ScoringStrategy for FuzzyCosineStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FuzzyCosine
    }

    fn score<'a>(
        &self,
        query: &TagSet,
        candidates: &'a [Product],
        _jitter: &mut Jitter,
    ) -> Result<Vec<ScoredCandidate<'a>>, RankingError> {
        let mut documents = Vec::with_capacity(candidates.len() + 1);
        documents.push(query.joined());
        documents.extend(candidates.iter().map(|product| product.tags.join(" ")));

        let matrix = self.vectorizer.fit_transform(&documents)?;
        let Some(query_vector) = matrix.row(0) else {
            return Ok(Vec::new());
        };

        let scored = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, product)| {
                let similarity = cosine_similarity(query_vector, matrix.row(index + 1)?);
                let exact_matches = query.overlap(&product.tags);
                let score = self.boosted(similarity, exact_matches);

                (score > 0.0).then_some(ScoredCandidate {
                    product,
                    score,
                    exact_matches,
                })
            })
            .collect();

        Ok(scored)
    }
}
