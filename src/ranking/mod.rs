//! Tag-based product ranking.
//!
//! A query tag set is scored against every candidate the catalog returns,
//! candidates at or below the minimum threshold are dropped, and the rest are
//! sorted and truncated to the requested limit.
//!
//! # Architecture
//!
//! - `exact`: overlap of query and product tag sets (baseline, always available)
//! - `tfidf`: character n-gram TF-IDF vectors and cosine similarity
//! - `fuzzy`: cosine similarity over concatenated tags, boosted by exact matches
//! - `pipeline`: strategy selection, thresholding, ordering, truncation
//! - `controller`: primary retrieval with a single degraded retry
//! - `jitter`: optional tie-breaking noise for exact scores

mod controller;
mod exact;
mod fuzzy;
mod jitter;
mod pipeline;
mod query;
mod strategy;
mod tfidf;

pub use controller::{FallbackController, RetrievalState, SearchOutcome};
pub use exact::ExactOverlapStrategy;
pub use fuzzy::FuzzyCosineStrategy;
pub use jitter::Jitter;
pub use pipeline::{ProductScore, Ranked, RankingPipeline};
pub use query::{SearchError, SearchQuery};
pub use strategy::{ScoredCandidate, ScoringStrategy, StrategyKind};
pub use tfidf::{cosine_similarity, CharNgramVectorizer, SparseVector, TfIdfMatrix};

/// Errors raised while building the vector space for fuzzy scoring.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("empty vocabulary: no document produced an n-gram")]
    EmptyVocabulary,

    #[error("invalid n-gram range {min}..={max}")]
    InvalidNgramRange { min: usize, max: usize },
}
