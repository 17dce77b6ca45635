use crate::{catalog::CatalogFilter, tags::TagSet};

use super::StrategyKind;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },
}

impl SearchError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SearchError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A validated search query.
///
/// Only constructible through [`SearchQuery::new`] and the `with_*`
/// builders, which reject a zero limit, negative or non-finite prices and
/// inverted price ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    tags: TagSet,
    limit: usize,
    filter: CatalogFilter,
    strategy: StrategyKind,
}

impl SearchQuery {
    pub fn new(tags: TagSet, limit: usize) -> Result<Self, SearchError> {
        if limit == 0 {
            return Err(SearchError::validation("limit", "must be at least 1"));
        }

        Ok(Self {
            tags,
            limit,
            filter: CatalogFilter::default(),
            strategy: StrategyKind::FuzzyCosine,
        })
    }

    pub fn with_price_range(
        mut self,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<Self, SearchError> {
        for (field, price) in [("min_price", min_price), ("max_price", max_price)] {
            if let Some(price) = price {
                if !price.is_finite() || price < 0.0 {
                    return Err(SearchError::validation(
                        field,
                        format!("must be a non-negative number, got {price}"),
                    ));
                }
            }
        }

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(SearchError::validation(
                    "min_price",
                    format!("{min} is greater than max_price {max}"),
                ));
            }
        }

        self.filter.min_price = min_price;
        self.filter.max_price = max_price;
        Ok(self)
    }

    /// Blank categories mean "any category".
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.filter.category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self
    }

    /// Preferred scoring strategy; fuzzy may still degrade to exact overlap.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_rejected() {
        let err = SearchQuery::new(TagSet::default(), 0).unwrap_err();
        assert!(matches!(err, SearchError::Validation { ref field, .. } if field == "limit"));
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let err = SearchQuery::new(TagSet::default(), 4)
            .unwrap()
            .with_price_range(Some(100.0), Some(10.0))
            .unwrap_err();
        assert!(matches!(err, SearchError::Validation { ref field, .. } if field == "min_price"));
    }

    #[test]
    fn test_negative_and_nan_prices_rejected() {
        let query = SearchQuery::new(TagSet::default(), 4).unwrap();
        assert!(query.clone().with_price_range(Some(-1.0), None).is_err());
        assert!(query.clone().with_price_range(None, Some(f64::NAN)).is_err());
        assert!(query.with_price_range(Some(0.0), Some(0.0)).is_ok());
    }

    #[test]
    fn test_blank_category_is_ignored() {
        let query = SearchQuery::new(TagSet::default(), 4)
            .unwrap()
            .with_category(Some("  ".to_string()));
        assert_eq!(query.filter().category, None);

        let query = query.with_category(Some(" banyo ".to_string()));
        assert_eq!(query.filter().category.as_deref(), Some("banyo"));
    }
}
