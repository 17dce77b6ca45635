use crate::{
    app::AppError,
    cards::{CardCreate, CardStore, CardsCsv, ProductCard},
    catalog::{self, CatalogCsv, CatalogFilter, CatalogReader, CatalogStats, Product},
    config::Config,
    search::{SearchRequest, SearchResponse, SearchService},
};

/// Everything the CLI and the daemon can do, wired to one base directory.
pub struct AppService {
    config: Config,
    catalog: CatalogCsv,
    cards: CardsCsv,
    search: SearchService,
}

impl AppService {
    pub fn new(config: Config, catalog: CatalogCsv, cards: CardsCsv, search: SearchService) -> Self {
        Self {
            config,
            catalog,
            cards,
            search,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse, AppError> {
        Ok(self.search.search(request)?)
    }

    /// Candidates straight from the local catalog, as served to remote peers.
    pub fn candidates(&self, filter: &CatalogFilter) -> Result<Vec<Product>, AppError> {
        Ok(self.catalog.fetch_candidates(filter)?)
    }

    pub fn list_products(&self, limit: usize) -> Result<Vec<Product>, AppError> {
        let products = self.catalog.load()?;
        Ok(catalog::top_rated(&products, limit))
    }

    pub fn categories(&self) -> Result<Vec<String>, AppError> {
        let products = self.catalog.load()?;
        Ok(catalog::categories(&products))
    }

    pub fn stats(&self) -> Result<CatalogStats, AppError> {
        let products = self.catalog.load()?;
        Ok(catalog::stats(&products))
    }

    /// Replaces the catalog with the demo products.
    pub fn reseed(&self, force: bool) -> Result<usize, AppError> {
        if !force && !self.catalog.load()?.is_empty() {
            return Err(AppError::InvalidInput(
                "catalog is not empty, pass --force to overwrite it".to_string(),
            ));
        }
        Ok(self.catalog.reseed()?)
    }

    pub fn create_card(&self, create: CardCreate) -> Result<ProductCard, AppError> {
        create
            .validate()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        Ok(self.cards.create(create)?)
    }

    pub fn list_cards(&self, limit: usize) -> Result<Vec<ProductCard>, AppError> {
        Ok(self.cards.list(limit)?)
    }

    pub fn find_cards(&self, query: &str, limit: usize) -> Result<Vec<ProductCard>, AppError> {
        Ok(self.cards.search_description(query, limit)?)
    }
}
