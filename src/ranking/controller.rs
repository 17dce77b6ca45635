use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogError, CatalogReader};

use super::{Ranked, RankingPipeline, SearchQuery};

/// Which retrieval path produced the results of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalState {
    Primary,
    Degraded,
    Empty,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub ranked: Ranked,
    pub state: RetrievalState,
}

impl SearchOutcome {
    fn empty() -> Self {
        SearchOutcome {
            ranked: Ranked::default(),
            state: RetrievalState::Empty,
        }
    }
}

/// Runs the primary retrieval path and, when it fails or finds nothing,
/// exactly one degraded attempt: exact-overlap scoring over the fallback
/// reader. Catalog errors are logged and never reach the caller.
pub struct FallbackController {
    primary: Arc<dyn CatalogReader>,
    fallback: Arc<dyn CatalogReader>,
    pipeline: RankingPipeline,
}

impl FallbackController {
    pub fn new(
        primary: Arc<dyn CatalogReader>,
        fallback: Arc<dyn CatalogReader>,
        pipeline: RankingPipeline,
    ) -> Self {
        Self {
            primary,
            fallback,
            pipeline,
        }
    }

    pub fn search(&self, query: &SearchQuery) -> SearchOutcome {
        match self.primary_pass(query) {
            Ok(ranked) if !ranked.is_empty() => {
                return SearchOutcome {
                    ranked,
                    state: RetrievalState::Primary,
                };
            }
            Ok(_) => log::debug!("primary retrieval found nothing, scanning fallback catalog"),
            Err(e) => log::warn!("primary retrieval failed, scanning fallback catalog: {e}"),
        }

        match self.degraded_pass(query) {
            Ok(ranked) if !ranked.is_empty() => SearchOutcome {
                ranked,
                state: RetrievalState::Degraded,
            },
            Ok(_) => {
                log::debug!("fallback catalog scan found nothing");
                SearchOutcome::empty()
            }
            Err(e) => {
                log::error!("fallback catalog scan failed: {e}");
                SearchOutcome::empty()
            }
        }
    }

    fn primary_pass(&self, query: &SearchQuery) -> Result<Ranked, CatalogError> {
        let candidates = self.primary.fetch_candidates(query.filter())?;
        Ok(self.pipeline.rank(query, &candidates))
    }

    fn degraded_pass(&self, query: &SearchQuery) -> Result<Ranked, CatalogError> {
        let candidates = self.fallback.fetch_candidates(query.filter())?;
        Ok(self.pipeline.rank_exact(query, &candidates))
    }
}
