use std::sync::Arc;

use super::{CatalogError, CatalogFilter, CatalogReader, Product};

/// Immutable in-memory catalog. Cloning shares the product list.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: Arc<Vec<Product>>,
}

impl MemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(products),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }
}

impl CatalogReader for MemoryCatalog {
    fn fetch_candidates(&self, filter: &CatalogFilter) -> Result<Vec<Product>, CatalogError> {
        Ok(filter.apply(self.products.iter().cloned()))
    }
}
