use serde::{Deserialize, Serialize};

use crate::{catalog::Product, tags::TagSet};

use super::{Jitter, RankingError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    ExactOverlap,
    FuzzyCosine,
}

/// A candidate paired with its relevance for one query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub product: &'a Product,
    pub score: f64,
    /// `|query ∩ product tags|`
    pub exact_matches: usize,
}

pub trait ScoringStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Scores every candidate. Candidates with no relevance at all are left
    /// out; threshold filtering and ordering belong to the pipeline.
    fn score<'a>(
        &self,
        query: &TagSet,
        candidates: &'a [Product],
        jitter: &mut Jitter,
    ) -> Result<Vec<ScoredCandidate<'a>>, RankingError>;
}
