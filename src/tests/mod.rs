mod catalog_csv;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::{
    catalog::{CatalogError, CatalogFilter, CatalogReader, MemoryCatalog, Product},
    config::SearchConfig,
    ranking::{FallbackController, RankingPipeline},
};

pub fn product(id: &str, tags: &[&str]) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        description: String::new(),
        price: 100.0,
        currency: "TL".to_string(),
        image_url: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        category: "genel".to_string(),
        subcategory: None,
        brand: None,
        stock: 10,
        rating: None,
        review_count: None,
    }
}

pub fn priced(id: &str, tags: &[&str], price: f64, category: &str, stock: u32) -> Product {
    Product {
        price,
        category: category.to_string(),
        stock,
        ..product(id, tags)
    }
}

/// Reader whose every fetch fails, counting the attempts.
#[derive(Default)]
pub struct FailingCatalog {
    pub calls: AtomicUsize,
}

impl CatalogReader for FailingCatalog {
    fn fetch_candidates(&self, _filter: &CatalogFilter) -> Result<Vec<Product>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CatalogError::RemoteResponse("catalog offline".to_string()))
    }
}

pub fn memory(products: Vec<Product>) -> Arc<MemoryCatalog> {
    Arc::new(MemoryCatalog::new(products))
}

pub fn controller_with(
    primary: Arc<dyn CatalogReader>,
    fallback: Arc<dyn CatalogReader>,
    config: &SearchConfig,
) -> FallbackController {
    let pipeline = RankingPipeline::from_config(config).unwrap();
    FallbackController::new(primary, fallback, pipeline)
}

/// Same catalog on both paths.
pub fn controller(products: Vec<Product>, config: &SearchConfig) -> FallbackController {
    let catalog = memory(products);
    controller_with(catalog.clone(), catalog, config)
}
