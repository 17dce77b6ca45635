//! Product catalog: records, filters and read access.
//!
//! The ranking core only ever sees the catalog through [`CatalogReader`]:
//! "given a filter, return the in-stock candidates". Three readers exist:
//!
//! - `backend_csv`: the on-disk catalog (`catalog.csv`), re-read per query
//! - `memory`: an immutable snapshot, used as the always-available source
//! - `remote`: another shopfind daemon reached over HTTP

mod backend_csv;
mod memory;
mod remote;
mod seed;

pub use backend_csv::CatalogCsv;
pub use memory::MemoryCatalog;
pub use remote::{RemoteCatalog, CANDIDATES_ROUTE};
pub use seed::demo_products;

use std::{collections::BTreeSet, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::tags::normalize_tags;

/// Highest accepted product rating.
pub const MAX_RATING: f32 = 5.0;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("remote catalog request failed: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("remote catalog responded with an error: {0}")]
    RemoteResponse(String),

    #[error("invalid product record: {0}")]
    InvalidRecord(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

fn default_currency() -> String {
    "TL".to_string()
}

impl Hash for Product {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Checks the record and normalizes its tags.
    ///
    /// Applied at every ingestion boundary (CSV rows, remote payloads) so
    /// malformed records never reach scoring.
    pub fn validated(mut self) -> Result<Self, CatalogError> {
        if self.id.trim().is_empty() {
            return Err(CatalogError::InvalidRecord("empty id".to_string()));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(CatalogError::InvalidRecord(format!(
                "product {}: price must be positive, got {}",
                self.id, self.price
            )));
        }
        if let Some(rating) = self.rating {
            if !(0.0..=MAX_RATING).contains(&rating) {
                return Err(CatalogError::InvalidRecord(format!(
                    "product {}: rating must be between 0 and {MAX_RATING}, got {rating}",
                    self.id
                )));
            }
        }

        self.tags = normalize_tags(&self.tags);
        Ok(self)
    }
}

/// Conjunctive candidate filter. Stock > 0 is always required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFilter {
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

impl CatalogFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if !product.in_stock() {
            return false;
        }
        if let Some(min_price) = self.min_price {
            if product.price < min_price {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if product.price > max_price {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if &product.category != category {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, products: impl IntoIterator<Item = Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Read access to the candidate universe of a query.
///
/// Implementations return only in-stock products satisfying the filter,
/// in no particular order, and an empty list when nothing matches.
pub trait CatalogReader: Send + Sync {
    fn fetch_candidates(&self, filter: &CatalogFilter) -> Result<Vec<Product>, CatalogError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub status: String,
    pub products_count: usize,
    pub in_stock_count: usize,
    pub categories_count: usize,
}

/// In-stock products ordered by rating, then review count.
pub fn top_rated(products: &[Product], limit: usize) -> Vec<Product> {
    let mut in_stock: Vec<Product> = products.iter().filter(|p| p.in_stock()).cloned().collect();

    in_stock.sort_by(|a, b| {
        b.rating
            .unwrap_or(0.0)
            .total_cmp(&a.rating.unwrap_or(0.0))
            .then_with(|| b.review_count.unwrap_or(0).cmp(&a.review_count.unwrap_or(0)))
            .then_with(|| a.id.cmp(&b.id))
    });

    in_stock.truncate(limit);
    in_stock
}

/// Sorted distinct categories of in-stock products.
pub fn categories(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .filter(|p| p.in_stock())
        .map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn stats(products: &[Product]) -> CatalogStats {
    CatalogStats {
        status: "operational".to_string(),
        products_count: products.len(),
        in_stock_count: products.iter().filter(|p| p.in_stock()).count(),
        categories_count: categories(products).len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64, category: &str, stock: u32) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            price,
            currency: default_currency(),
            image_url: None,
            tags: vec![],
            category: category.to_string(),
            subcategory: None,
            brand: None,
            stock,
            rating: None,
            review_count: None,
        }
    }

    #[test]
    fn test_filter_requires_stock() {
        let filter = CatalogFilter::default();
        assert!(filter.matches(&product("a", 10.0, "Banyo", 1)));
        assert!(!filter.matches(&product("b", 10.0, "Banyo", 0)));
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let filter = CatalogFilter {
            min_price: Some(10.0),
            max_price: Some(20.0),
            category: Some("Banyo".to_string()),
        };

        assert!(filter.matches(&product("a", 10.0, "Banyo", 3)));
        assert!(filter.matches(&product("b", 20.0, "Banyo", 3)));
        assert!(!filter.matches(&product("c", 9.99, "Banyo", 3)));
        assert!(!filter.matches(&product("d", 20.01, "Banyo", 3)));
        assert!(!filter.matches(&product("e", 15.0, "Temizlik", 3)));
    }

    #[test]
    fn test_validated_normalizes_tags() {
        let mut p = product("a", 10.0, "Banyo", 1);
        p.tags = vec!["Banyo Aksesuari".into(), "banyo_aksesuari".into(), " ".into()];
        let p = p.validated().unwrap();
        assert_eq!(p.tags, vec!["banyo_aksesuari"]);
    }

    #[test]
    fn test_validated_rejects_bad_price_and_rating() {
        assert!(product("a", 0.0, "Banyo", 1).validated().is_err());
        assert!(product("a", f64::NAN, "Banyo", 1).validated().is_err());

        let mut p = product("a", 5.0, "Banyo", 1);
        p.rating = Some(7.5);
        assert!(p.validated().is_err());
    }

    #[test]
    fn test_top_rated_order() {
        let mut a = product("a", 1.0, "X", 1);
        a.rating = Some(4.5);
        a.review_count = Some(10);
        let mut b = product("b", 1.0, "X", 1);
        b.rating = Some(4.5);
        b.review_count = Some(90);
        let mut c = product("c", 1.0, "X", 0);
        c.rating = Some(5.0);
        let d = product("d", 1.0, "Y", 1);

        let top = top_rated(&[a, b, c, d], 10);
        let ids: Vec<_> = top.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "d"]);
    }

    #[test]
    fn test_categories_and_stats() {
        let products = vec![
            product("a", 1.0, "Temizlik", 1),
            product("b", 1.0, "Banyo", 2),
            product("c", 1.0, "Banyo", 2),
            product("d", 1.0, "Dekorasyon", 0),
        ];

        assert_eq!(categories(&products), vec!["Banyo", "Temizlik"]);

        let stats = stats(&products);
        assert_eq!(stats.products_count, 4);
        assert_eq!(stats.in_stock_count, 3);
        assert_eq!(stats.categories_count, 2);
    }
}
