use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::Product,
    config::SearchConfig,
    ranking::{
        FallbackController, ProductScore, RetrievalState, SearchError, SearchQuery, StrategyKind,
    },
    tags::{normalize_tags, TagSet},
};

/// Raw search input as received from the CLI or the HTTP api.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub tags: Vec<String>,
    /// Signed so that negative values are reported as validation errors.
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub exact_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
    pub total_found: usize,
    pub search_tags: Vec<String>,
    /// Seconds.
    pub execution_time: f64,
    pub retrieval: RetrievalState,
    #[serde(default)]
    pub strategy: Option<StrategyKind>,
    #[serde(default)]
    pub scores: Vec<ProductScore>,
}

pub struct SearchService {
    controller: FallbackController,
    default_limit: usize,
    max_limit: usize,
}

impl SearchService {
    pub fn new(controller: FallbackController, config: &SearchConfig) -> Self {
        Self {
            controller,
            default_limit: config.default_limit,
            max_limit: config.max_limit,
        }
    }

    pub fn query_from(&self, request: &SearchRequest) -> Result<SearchQuery, SearchError> {
        let limit = match request.limit {
            None => self.default_limit,
            Some(limit) if limit < 1 => {
                return Err(SearchError::validation("limit", "must be at least 1"))
            }
            Some(limit) if limit as u64 > self.max_limit as u64 => {
                return Err(SearchError::validation(
                    "limit",
                    format!("must not exceed {}", self.max_limit),
                ))
            }
            Some(limit) => limit as usize,
        };

        let strategy = if request.exact_only {
            StrategyKind::ExactOverlap
        } else {
            StrategyKind::FuzzyCosine
        };

        Ok(
            SearchQuery::new(TagSet::new(normalize_tags(&request.tags)), limit)?
                .with_price_range(request.min_price, request.max_price)?
                .with_category(request.category.clone())
                .with_strategy(strategy),
        )
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let started = Instant::now();
        let query = self.query_from(request)?;

        let outcome = self.controller.search(&query);
        let execution_time = started.elapsed().as_secs_f64();

        log::debug!(
            "search {:?} -> {} of {} ({:?}, {:.3}s)",
            query.tags().joined(),
            outcome.ranked.products.len(),
            outcome.ranked.total_found,
            outcome.state,
            execution_time
        );

        Ok(SearchResponse {
            products: outcome.ranked.products,
            total_found: outcome.ranked.total_found,
            search_tags: query.tags().to_vec(),
            execution_time,
            retrieval: outcome.state,
            strategy: outcome.ranked.strategy,
            scores: outcome.ranked.scores,
        })
    }
}
